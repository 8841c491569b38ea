use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    CreateStudentRequest, EligibilityResponse, StudentListResponse, StudentQueryParams,
    StudentResponse, UpdateStudentRequest,
};
use crate::academics::AcademicRecord;
use crate::academics::evaluator::today;
use crate::entities::sea_orm_active_enums::{RoleEnum, StudentStatus};
use crate::extractor::{AuthClaims, require_role};
use crate::repositories::{
    CareerRepository, StudentFilter, StudentRepository, StudentSubjectRepository, StudentUpdate,
    UserRepository,
};
use crate::routes::student_subjects::dto::StudentSubjectResponse;
use crate::routes::subjects::dto::SubjectResponse;
use crate::routes::{
    ApiError, PaginationQuery, enrollment_error, ensure_student_access, internal_error, not_found,
};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/students", post(create_student).get(get_all_students))
        .route(
            "/api/v1/students/{student_id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/v1/students/{student_id}/record", get(get_academic_record))
        .route("/api/v1/students/{student_id}/subjects", get(get_student_subjects))
        .route(
            "/api/v1/students/{student_id}/available-subjects",
            get(get_available_subjects),
        )
        .route(
            "/api/v1/students/{student_id}/eligibility/{subject_id}",
            get(get_eligibility),
        )
}

async fn ensure_file_number_available(
    repo: &StudentRepository,
    file_number: &str,
    student_id: Option<i32>,
) -> Result<(), ApiError> {
    let existing = repo
        .find_by_file_number(file_number)
        .await
        .map_err(internal_error("Database error"))?;
    if existing.is_some_and(|s| Some(s.id) != student_id) {
        return Err((
            StatusCode::CONFLICT,
            format!("File number {} is already in use", file_number),
        ));
    }
    Ok(())
}

async fn ensure_career_exists(state: &AppState, career_id: i32) -> Result<(), ApiError> {
    CareerRepository::new(state.db.clone())
        .find_by_id(career_id)
        .await
        .map_err(internal_error("Failed to fetch career"))?
        .ok_or_else(|| not_found("Career"))?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "User is not a student"),
        (status = 404, description = "User or career not found"),
        (status = 409, description = "Duplicate student or file number")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "create students")?;
    if payload.file_number.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "File number is required".to_string(),
        ));
    }

    let user = UserRepository::new(state.db.clone())
        .find_by_id(payload.user_id)
        .await
        .map_err(internal_error("Failed to fetch user"))?
        .ok_or_else(|| not_found("User"))?;
    if user.role != RoleEnum::Student {
        return Err((
            StatusCode::BAD_REQUEST,
            "Only users with the student role can have a legajo".to_string(),
        ));
    }
    ensure_career_exists(&state, payload.career_id).await?;

    let repo = StudentRepository::new(state.db.clone());
    if repo
        .find_by_user_id(payload.user_id)
        .await
        .map_err(internal_error("Database error"))?
        .is_some()
    {
        return Err((
            StatusCode::CONFLICT,
            "User already has a student record".to_string(),
        ));
    }
    ensure_file_number_available(&repo, &payload.file_number, None).await?;

    let student = repo
        .create(
            payload.user_id,
            payload.career_id,
            payload.file_number,
            payload.enrollment_date.unwrap_or_else(today),
            payload.status.unwrap_or(StudentStatus::Active),
        )
        .await
        .map_err(internal_error("Failed to create student"))?;

    tracing::info!(student_id = student.id, file_number = %student.file_number, "Student created");
    Ok((StatusCode::CREATED, Json(student.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Page of students", body = StudentListResponse),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_all_students(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(params): Query<StudentQueryParams>,
) -> Result<(StatusCode, Json<StudentListResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin, RoleEnum::Teacher], "list students")?;

    let (page, page_size) = PaginationQuery {
        page: params.page,
        page_size: params.page_size,
    }
    .resolve();

    let filter = StudentFilter {
        career_id: params.career_id,
        status: params.status,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };
    let (students, total) = StudentRepository::new(state.db.clone())
        .find_all_with_pagination(page, page_size, filter)
        .await
        .map_err(internal_error("Failed to fetch students"))?;

    Ok((
        StatusCode::OK,
        Json(StudentListResponse {
            students: students.into_iter().map(StudentResponse::from).collect(),
            total,
            page,
            page_size,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student", body = StudentResponse),
        (status = 403, description = "Not your record"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<i32>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    ensure_student_access(&state, &claims, student_id).await?;

    let student = StudentRepository::new(state.db.clone())
        .find_by_id(student_id)
        .await
        .map_err(internal_error("Failed to fetch student"))?
        .ok_or_else(|| not_found("Student"))?;

    Ok((StatusCode::OK, Json(student.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = i32, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student or career not found"),
        (status = 409, description = "File number already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<i32>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "update students")?;

    let repo = StudentRepository::new(state.db.clone());
    repo.find_by_id(student_id)
        .await
        .map_err(internal_error("Failed to fetch student"))?
        .ok_or_else(|| not_found("Student"))?;
    if let Some(career_id) = payload.career_id {
        ensure_career_exists(&state, career_id).await?;
    }
    if let Some(file_number) = &payload.file_number {
        ensure_file_number_available(&repo, file_number, Some(student_id)).await?;
    }

    let student = repo
        .update(
            student_id,
            StudentUpdate {
                career_id: payload.career_id,
                file_number: payload.file_number,
                enrollment_date: payload.enrollment_date,
                status: payload.status,
            },
        )
        .await
        .map_err(internal_error("Failed to update student"))?;

    Ok((StatusCode::OK, Json(student.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{student_id}",
    params(("student_id" = i32, Path, description = "Student id")),
    responses(
        (status = 204, description = "Student deleted with its records and enrollments"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "delete students")?;

    let deleted = StudentRepository::new(state.db.clone())
        .delete(student_id)
        .await
        .map_err(internal_error("Failed to delete student"))?;
    if !deleted {
        return Err(not_found("Student"));
    }

    tracing::info!(student_id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Legajo with status counts, average grade and career progress
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/record",
    params(("student_id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Academic record", body = AcademicRecord),
        (status = 403, description = "Not your record"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_academic_record(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<i32>,
) -> Result<(StatusCode, Json<AcademicRecord>), ApiError> {
    ensure_student_access(&state, &claims, student_id).await?;

    let record = state
        .enrollments
        .academic_record(student_id)
        .await
        .map_err(enrollment_error)?;

    Ok((StatusCode::OK, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/subjects",
    params(("student_id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student subject rows", body = Vec<StudentSubjectResponse>),
        (status = 403, description = "Not your record"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student_subjects(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<i32>,
) -> Result<(StatusCode, Json<Vec<StudentSubjectResponse>>), ApiError> {
    ensure_student_access(&state, &claims, student_id).await?;

    StudentRepository::new(state.db.clone())
        .find_by_id(student_id)
        .await
        .map_err(internal_error("Failed to fetch student"))?
        .ok_or_else(|| not_found("Student"))?;

    let rows = StudentSubjectRepository::new(state.db.clone())
        .find_by_student_with_subject(student_id)
        .await
        .map_err(internal_error("Failed to fetch student subjects"))?;

    let response = rows
        .into_iter()
        .map(|(record, subject)| StudentSubjectResponse::new(record, subject.as_ref()))
        .collect();

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/available-subjects",
    params(("student_id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Subjects the student can enroll in", body = Vec<SubjectResponse>),
        (status = 403, description = "Not your record"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_available_subjects(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<i32>,
) -> Result<(StatusCode, Json<Vec<SubjectResponse>>), ApiError> {
    ensure_student_access(&state, &claims, student_id).await?;

    let subjects = state
        .enrollments
        .available_subjects(student_id)
        .await
        .map_err(enrollment_error)?;

    Ok((
        StatusCode::OK,
        Json(subjects.into_iter().map(SubjectResponse::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}/eligibility/{subject_id}",
    params(
        ("student_id" = i32, Path, description = "Student id"),
        ("subject_id" = i32, Path, description = "Subject id")
    ),
    responses(
        (status = 200, description = "Prerequisite check", body = EligibilityResponse),
        (status = 403, description = "Not your record"),
        (status = 404, description = "Student or subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_eligibility(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path((student_id, subject_id)): Path<(i32, i32)>,
) -> Result<(StatusCode, Json<EligibilityResponse>), ApiError> {
    ensure_student_access(&state, &claims, student_id).await?;

    let eligibility = state
        .enrollments
        .check_eligibility(student_id, subject_id)
        .await
        .map_err(enrollment_error)?;

    Ok((
        StatusCode::OK,
        Json(EligibilityResponse::new(student_id, subject_id, eligibility)),
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;

    use crate::entities::sea_orm_active_enums::RoleEnum;
    use crate::routes::test_support::test_app;

    #[tokio::test]
    async fn test_eligibility_for_staff() {
        let app = test_app();
        let token = app.token(RoleEnum::Teacher);
        let uri = format!("/api/v1/students/{}/eligibility/{}", app.student, app.analysis);
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["eligible"], false);
        assert_eq!(body["missing"][0]["code"], "MAT101");
    }
}
