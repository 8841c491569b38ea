use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{CareerResponse, CreateCareerRequest, UpdateCareerRequest};
use crate::config::DEFAULT_CAREER_DURATION_YEARS;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::{AuthClaims, require_role};
use crate::repositories::{CareerRepository, CareerUpdate, SubjectRepository};
use crate::routes::subjects::dto::SubjectResponse;
use crate::routes::{ApiError, internal_error, not_found};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/careers", post(create_career).get(get_all_careers))
        .route(
            "/api/v1/careers/{career_id}",
            get(get_career).put(update_career).delete(delete_career),
        )
        .route("/api/v1/careers/{career_id}/subjects", get(get_career_subjects))
}

async fn ensure_code_available(
    repo: &CareerRepository,
    code: &str,
    career_id: Option<i32>,
) -> Result<(), ApiError> {
    let existing = repo
        .find_by_code(code)
        .await
        .map_err(internal_error("Database error"))?;
    if existing.is_some_and(|c| Some(c.id) != career_id) {
        return Err((
            StatusCode::CONFLICT,
            format!("Career code {} is already in use", code),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/careers",
    request_body = CreateCareerRequest,
    responses(
        (status = 201, description = "Career created", body = CareerResponse),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Careers"
)]
pub async fn create_career(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateCareerRequest>,
) -> Result<(StatusCode, Json<CareerResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "create careers")?;
    payload.validate().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let repo = CareerRepository::new(state.db.clone());
    ensure_code_available(&repo, &payload.code, None).await?;

    let career = repo
        .create(
            payload.name,
            payload.code,
            payload.description,
            payload.duration_years.unwrap_or(DEFAULT_CAREER_DURATION_YEARS),
        )
        .await
        .map_err(internal_error("Failed to create career"))?;

    tracing::info!(career_id = career.id, code = %career.code, "Career created");
    Ok((StatusCode::CREATED, Json(career.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/careers",
    responses((status = 200, description = "All careers", body = Vec<CareerResponse>)),
    security(("bearer_auth" = [])),
    tag = "Careers"
)]
pub async fn get_all_careers(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
) -> Result<(StatusCode, Json<Vec<CareerResponse>>), ApiError> {
    let careers = CareerRepository::new(state.db.clone())
        .find_all()
        .await
        .map_err(internal_error("Failed to fetch careers"))?;

    Ok((
        StatusCode::OK,
        Json(careers.into_iter().map(CareerResponse::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/careers/{career_id}",
    params(("career_id" = i32, Path, description = "Career id")),
    responses(
        (status = 200, description = "Career", body = CareerResponse),
        (status = 404, description = "Career not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Careers"
)]
pub async fn get_career(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Path(career_id): Path<i32>,
) -> Result<(StatusCode, Json<CareerResponse>), ApiError> {
    let career = CareerRepository::new(state.db.clone())
        .find_by_id(career_id)
        .await
        .map_err(internal_error("Failed to fetch career"))?
        .ok_or_else(|| not_found("Career"))?;

    Ok((StatusCode::OK, Json(career.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/careers/{career_id}",
    params(("career_id" = i32, Path, description = "Career id")),
    request_body = UpdateCareerRequest,
    responses(
        (status = 200, description = "Career updated", body = CareerResponse),
        (status = 404, description = "Career not found"),
        (status = 409, description = "Code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Careers"
)]
pub async fn update_career(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(career_id): Path<i32>,
    Json(payload): Json<UpdateCareerRequest>,
) -> Result<(StatusCode, Json<CareerResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "update careers")?;

    let repo = CareerRepository::new(state.db.clone());
    repo.find_by_id(career_id)
        .await
        .map_err(internal_error("Failed to fetch career"))?
        .ok_or_else(|| not_found("Career"))?;
    if let Some(code) = &payload.code {
        ensure_code_available(&repo, code, Some(career_id)).await?;
    }
    if payload.duration_years.is_some_and(|years| years < 1) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Duration must be at least one year".to_string(),
        ));
    }

    let career = repo
        .update(
            career_id,
            CareerUpdate {
                name: payload.name,
                code: payload.code,
                description: payload.description,
                duration_years: payload.duration_years,
            },
        )
        .await
        .map_err(internal_error("Failed to update career"))?;

    Ok((StatusCode::OK, Json(career.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/careers/{career_id}",
    params(("career_id" = i32, Path, description = "Career id")),
    responses(
        (status = 204, description = "Career and its subjects deleted"),
        (status = 404, description = "Career not found"),
        (status = 409, description = "Career still has students")
    ),
    security(("bearer_auth" = [])),
    tag = "Careers"
)]
pub async fn delete_career(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(career_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "delete careers")?;

    let repo = CareerRepository::new(state.db.clone());
    let students = repo
        .count_students(career_id)
        .await
        .map_err(internal_error("Failed to count students"))?;
    if students > 0 {
        return Err((
            StatusCode::CONFLICT,
            format!("Career has {} students and cannot be deleted", students),
        ));
    }

    let deleted = repo
        .delete(career_id)
        .await
        .map_err(internal_error("Failed to delete career"))?;
    if !deleted {
        return Err(not_found("Career"));
    }

    tracing::info!(career_id, "Career deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Plan of study, ordered by year and code
#[utoipa::path(
    get,
    path = "/api/v1/careers/{career_id}/subjects",
    params(("career_id" = i32, Path, description = "Career id")),
    responses(
        (status = 200, description = "Subjects of the career", body = Vec<SubjectResponse>),
        (status = 404, description = "Career not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Careers"
)]
pub async fn get_career_subjects(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Path(career_id): Path<i32>,
) -> Result<(StatusCode, Json<Vec<SubjectResponse>>), ApiError> {
    CareerRepository::new(state.db.clone())
        .find_by_id(career_id)
        .await
        .map_err(internal_error("Failed to fetch career"))?
        .ok_or_else(|| not_found("Career"))?;

    let subjects = SubjectRepository::new(state.db.clone())
        .find_by_career(career_id)
        .await
        .map_err(internal_error("Failed to fetch subjects"))?;

    Ok((
        StatusCode::OK,
        Json(subjects.into_iter().map(SubjectResponse::from).collect()),
    ))
}
