use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};

use super::dto::{EnrollRequest, EnrollResponse, EnrollmentQueryParams, EnrollmentResponse};
use crate::academics::EnrollmentRequest;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::{AuthClaims, require_role};
use crate::repositories::{EnrollmentRepository, StudentRepository};
use crate::routes::{ApiError, enrollment_error, internal_error};
use crate::state::AppState;
use crate::utils::jwt::TokenClaims;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/enrollments", get(get_enrollments).post(enroll))
        .route("/api/v1/enrollments/{enrollment_id}", delete(delete_enrollment))
}

/// Students may only enroll themselves; staff must name the student.
async fn resolve_student_id(
    state: &AppState,
    claims: &TokenClaims,
    requested: Option<i32>,
) -> Result<i32, ApiError> {
    if claims.is_staff() {
        return requested.ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "student_id is required".to_string(),
            )
        });
    }

    let own = StudentRepository::new(state.db.clone())
        .find_by_user_id(claims.user_id)
        .await
        .map_err(internal_error("Failed to load student"))?
        .ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                "Your account has no student record".to_string(),
            )
        })?;

    match requested {
        Some(student_id) if student_id != own.id => Err((
            StatusCode::FORBIDDEN,
            "Students can only enroll themselves".to_string(),
        )),
        _ => Ok(own.id),
    }
}

/// Enrolls a student in a subject after checking its prerequisites
#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Enrolled", body = EnrollResponse),
        (status = 400, description = "Prerequisites not met or invalid request, one message per line"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Student or subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
pub async fn enroll(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollResponse>), ApiError> {
    let student_id = resolve_student_id(&state, &claims, payload.student_id).await?;

    let outcome = state
        .enrollments
        .enroll(EnrollmentRequest {
            student_id,
            subject_id: payload.subject_id,
            enrollment_type: payload.enrollment_type,
            exam_date: payload.exam_date,
        })
        .await
        .map_err(enrollment_error)?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    params(EnrollmentQueryParams),
    responses(
        (status = 200, description = "Enrollments, newest first", body = Vec<EnrollmentResponse>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
pub async fn get_enrollments(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(params): Query<EnrollmentQueryParams>,
) -> Result<(StatusCode, Json<Vec<EnrollmentResponse>>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin, RoleEnum::Teacher], "list enrollments")?;

    let rows = EnrollmentRepository::new(state.db.clone())
        .find_all(params.student_id, params.subject_id)
        .await
        .map_err(internal_error("Failed to fetch enrollments"))?;

    let response = rows
        .into_iter()
        .map(|(enrollment, subject)| EnrollmentResponse::new(enrollment, subject.as_ref()))
        .collect();

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{enrollment_id}",
    params(("enrollment_id" = i32, Path, description = "Enrollment id")),
    responses(
        (status = 204, description = "Enrollment deleted, student subject rows are kept"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(enrollment_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "delete enrollments")?;

    state
        .enrollments
        .delete_enrollment(enrollment_id)
        .await
        .map_err(enrollment_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::entities::sea_orm_active_enums::RoleEnum;
    use crate::routes::test_support::{json_request, test_app};

    #[tokio::test]
    async fn test_enroll_requires_token() {
        let app = test_app();
        let body = json!({ "student_id": app.student, "subject_id": app.algebra, "enrollment_type": "cursada" });

        let (status, _) = app
            .send(json_request("POST", "/api/v1/enrollments", None, body))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_enroll_without_prerequisites_lists_missing_subjects() {
        let app = test_app();
        let token = app.token(RoleEnum::Teacher);
        let body = json!({ "student_id": app.student, "subject_id": app.analysis, "enrollment_type": "cursada" });

        let (status, body) = app
            .send(json_request("POST", "/api/v1/enrollments", Some(&token), body))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Falta regularizar materia MAT101 - Álgebra I");
        assert!(app.store.enrollments().is_empty());
        assert!(app.store.student_subjects().is_empty());
    }

    #[tokio::test]
    async fn test_cursada_opens_student_subject() {
        let app = test_app();
        let token = app.token(RoleEnum::Admin);
        let body = json!({ "student_id": app.student, "subject_id": app.algebra, "enrollment_type": "cursada" });

        let (status, body) = app
            .send(json_request("POST", "/api/v1/enrollments", Some(&token), body))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["enrollment"]["enrollment_type"], "cursada");
        assert_eq!(body["enrollment"]["subject_code"], "MAT101");
        assert_eq!(body["enrollment"]["subject_name"], "Álgebra I");
        assert_eq!(body["student_subject"]["status"], "cursando");
        assert_eq!(body["student_subject"]["grade"], Value::Null);
        assert_eq!(app.store.enrollments().len(), 1);
        assert_eq!(app.store.student_subjects().len(), 1);
    }

    #[tokio::test]
    async fn test_staff_must_name_the_student() {
        let app = test_app();
        let token = app.token(RoleEnum::Admin);
        let body = json!({ "subject_id": app.algebra, "enrollment_type": "cursada" });

        let (status, _) = app
            .send(json_request("POST", "/api/v1/enrollments", Some(&token), body))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_only_admin_deletes_enrollments() {
        let app = test_app();
        let teacher = app.token(RoleEnum::Teacher);
        let admin = app.token(RoleEnum::Admin);

        let (status, _) = app
            .send(json_request("DELETE", "/api/v1/enrollments/1", Some(&teacher), json!({})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .send(json_request("DELETE", "/api/v1/enrollments/999", Some(&admin), json!({})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
