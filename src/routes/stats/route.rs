use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use super::dto::{
    ActivityQuery, ActivityResponse, DashboardResponse, StudentCounts, SubjectStatusCounts,
};
use crate::config::ACTIVITY_FEED_LIMIT;
use crate::entities::sea_orm_active_enums::{RoleEnum, StudentStatus, StudentSubjectStatus};
use crate::extractor::{AuthClaims, require_role};
use crate::repositories::{
    CareerRepository, EnrollmentRepository, StudentRepository, StudentSubjectRepository,
    SubjectRepository,
};
use crate::routes::student_subjects::dto::StudentSubjectResponse;
use crate::routes::{ApiError, internal_error};
use crate::state::AppState;

const STAFF: [RoleEnum; 2] = [RoleEnum::Admin, RoleEnum::Teacher];

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/stats/dashboard", get(get_dashboard))
        .route("/api/v1/stats/activity", get(get_activity))
}

#[utoipa::path(
    get,
    path = "/api/v1/stats/dashboard",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardResponse),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<(StatusCode, Json<DashboardResponse>), ApiError> {
    require_role(&claims, &STAFF, "view statistics")?;

    let total_careers = CareerRepository::new(state.db.clone())
        .find_all()
        .await
        .map_err(internal_error("Failed to count careers"))?
        .len();
    let total_subjects = SubjectRepository::new(state.db.clone())
        .find_all(None)
        .await
        .map_err(internal_error("Failed to count subjects"))?
        .len();
    let total_enrollments = EnrollmentRepository::new(state.db.clone())
        .count()
        .await
        .map_err(internal_error("Failed to count enrollments"))?;

    let student_repo = StudentRepository::new(state.db.clone());
    let mut students = StudentCounts {
        active: 0,
        inactive: 0,
        graduated: 0,
    };
    for (status, slot) in [
        (StudentStatus::Active, &mut students.active),
        (StudentStatus::Inactive, &mut students.inactive),
        (StudentStatus::Graduated, &mut students.graduated),
    ] {
        *slot = student_repo
            .count_by_status(status)
            .await
            .map_err(internal_error("Failed to count students"))?;
    }

    let record_repo = StudentSubjectRepository::new(state.db.clone());
    let mut student_subjects = SubjectStatusCounts {
        cursando: 0,
        regular: 0,
        acreditada: 0,
        libre: 0,
    };
    for (status, slot) in [
        (StudentSubjectStatus::Cursando, &mut student_subjects.cursando),
        (StudentSubjectStatus::Regular, &mut student_subjects.regular),
        (StudentSubjectStatus::Acreditada, &mut student_subjects.acreditada),
        (StudentSubjectStatus::Libre, &mut student_subjects.libre),
    ] {
        *slot = record_repo
            .count_by_status(status)
            .await
            .map_err(internal_error("Failed to count student subjects"))?;
    }

    Ok((
        StatusCode::OK,
        Json(DashboardResponse {
            total_careers,
            total_subjects,
            total_enrollments,
            students,
            student_subjects,
        }),
    ))
}

/// Most recently modified student subject rows
#[utoipa::path(
    get,
    path = "/api/v1/stats/activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Recent activity", body = ActivityResponse),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn get_activity(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(query): Query<ActivityQuery>,
) -> Result<(StatusCode, Json<ActivityResponse>), ApiError> {
    require_role(&claims, &STAFF, "view statistics")?;

    let rows = StudentSubjectRepository::new(state.db.clone())
        .find_recent(query.resolve(ACTIVITY_FEED_LIMIT))
        .await
        .map_err(internal_error("Failed to fetch activity"))?;

    let entries = rows
        .into_iter()
        .map(|(record, subject)| StudentSubjectResponse::new(record, subject.as_ref()))
        .collect();

    Ok((StatusCode::OK, Json(ActivityResponse { entries })))
}
