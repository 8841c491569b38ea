use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};

use super::dto::{CreateStudentSubjectRequest, StudentSubjectResponse, UpdateStatusRequest};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::{AuthClaims, require_role};
use crate::routes::{ApiError, enrollment_error};
use crate::state::AppState;

const STAFF: [RoleEnum; 2] = [RoleEnum::Admin, RoleEnum::Teacher];

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/student-subjects", post(create_student_subject))
        .route("/api/v1/student-subjects/{student_subject_id}", patch(update_status))
}

/// Direct record entry, e.g. transcribing an exam act
#[utoipa::path(
    post,
    path = "/api/v1/student-subjects",
    request_body = CreateStudentSubjectRequest,
    responses(
        (status = 201, description = "Record created", body = StudentSubjectResponse),
        (status = 400, description = "Invalid status or grade"),
        (status = 404, description = "Student or subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Student subjects"
)]
pub async fn create_student_subject(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateStudentSubjectRequest>,
) -> Result<(StatusCode, Json<StudentSubjectResponse>), ApiError> {
    require_role(&claims, &STAFF, "record grades")?;

    let record = state
        .enrollments
        .record_student_subject(payload.into())
        .await
        .map_err(enrollment_error)?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/student-subjects/{student_subject_id}",
    params(("student_subject_id" = i32, Path, description = "Student subject id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StudentSubjectResponse),
        (status = 400, description = "Invalid status or grade"),
        (status = 404, description = "Record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Student subjects"
)]
pub async fn update_status(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_subject_id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<(StatusCode, Json<StudentSubjectResponse>), ApiError> {
    require_role(&claims, &STAFF, "update subject status")?;

    let record = state
        .enrollments
        .update_status(student_subject_id, payload.into())
        .await
        .map_err(enrollment_error)?;

    Ok((StatusCode::OK, Json(record.into())))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::entities::sea_orm_active_enums::{RoleEnum, StudentSubjectStatus};
    use crate::routes::test_support::{json_request, test_app};

    #[tokio::test]
    async fn test_update_status_to_acreditada_needs_grade() {
        let app = test_app();
        let token = app.token(RoleEnum::Teacher);
        let record = app.store.insert_record(
            app.student,
            app.algebra,
            StudentSubjectStatus::Cursando,
            None,
            None,
        );
        let uri = format!("/api/v1/student-subjects/{record}");

        let (status, _) = app
            .send(json_request("PATCH", &uri, Some(&token), json!({ "status": "acreditada" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(json_request(
                "PATCH",
                &uri,
                Some(&token),
                json!({ "status": "acreditada", "grade": 7 }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["grade"], 7);
        assert_eq!(body["status"], "acreditada");
    }
}
