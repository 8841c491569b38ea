use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};

use super::dto::{
    CreateRequirementRequest, CreateSubjectRequest, RequirementResponse, SubjectQueryParams,
    SubjectResponse, UpdateSubjectRequest,
};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::{AuthClaims, require_role};
use crate::repositories::{CareerRepository, RequirementRepository, SubjectRepository, SubjectUpdate};
use crate::routes::{ApiError, internal_error, not_found};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/subjects", post(create_subject).get(get_all_subjects))
        .route(
            "/api/v1/subjects/{subject_id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route(
            "/api/v1/subjects/{subject_id}/requirements",
            get(get_requirements).post(create_requirement),
        )
        .route("/api/v1/requirements/{requirement_id}", delete(delete_requirement))
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
    path = "/api/v1/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Career not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "create subjects")?;
    payload.validate().map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    ensure_career_exists(&state, payload.career_id).await?;

    let subject = SubjectRepository::new(state.db.clone())
        .create(
            payload.career_id,
            payload.code,
            payload.name,
            payload.year,
            payload.hours,
        )
        .await
        .map_err(internal_error("Failed to create subject"))?;

    tracing::info!(subject_id = subject.id, code = %subject.code, "Subject created");
    Ok((StatusCode::CREATED, Json(subject.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    params(SubjectQueryParams),
    responses((status = 200, description = "Subjects", body = Vec<SubjectResponse>)),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn get_all_subjects(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Query(params): Query<SubjectQueryParams>,
) -> Result<(StatusCode, Json<Vec<SubjectResponse>>), ApiError> {
    let subjects = SubjectRepository::new(state.db.clone())
        .find_all(params.career_id)
        .await
        .map_err(internal_error("Failed to fetch subjects"))?;

    Ok((
        StatusCode::OK,
        Json(subjects.into_iter().map(SubjectResponse::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/subjects/{subject_id}",
    params(("subject_id" = i32, Path, description = "Subject id")),
    responses(
        (status = 200, description = "Subject", body = SubjectResponse),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn get_subject(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Path(subject_id): Path<i32>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    let subject = SubjectRepository::new(state.db.clone())
        .find_by_id(subject_id)
        .await
        .map_err(internal_error("Failed to fetch subject"))?
        .ok_or_else(|| not_found("Subject"))?;

    Ok((StatusCode::OK, Json(subject.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/subjects/{subject_id}",
    params(("subject_id" = i32, Path, description = "Subject id")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Subject or career not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn update_subject(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(subject_id): Path<i32>,
    Json(payload): Json<UpdateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "update subjects")?;
    payload.validate().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let repo = SubjectRepository::new(state.db.clone());
    repo.find_by_id(subject_id)
        .await
        .map_err(internal_error("Failed to fetch subject"))?
        .ok_or_else(|| not_found("Subject"))?;
    if let Some(career_id) = payload.career_id {
        ensure_career_exists(&state, career_id).await?;
    }

    let subject = repo
        .update(
            subject_id,
            SubjectUpdate {
                career_id: payload.career_id,
                code: payload.code,
                name: payload.name,
                year: payload.year,
                hours: payload.hours,
            },
        )
        .await
        .map_err(internal_error("Failed to update subject"))?;

    Ok((StatusCode::OK, Json(subject.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/subjects/{subject_id}",
    params(("subject_id" = i32, Path, description = "Subject id")),
    responses(
        (status = 204, description = "Subject deleted with its requirements, records and enrollments"),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(subject_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "delete subjects")?;

    let deleted = SubjectRepository::new(state.db.clone())
        .delete(subject_id)
        .await
        .map_err(internal_error("Failed to delete subject"))?;
    if !deleted {
        return Err(not_found("Subject"));
    }

    tracing::info!(subject_id, "Subject deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/subjects/{subject_id}/requirements",
    params(("subject_id" = i32, Path, description = "Subject id")),
    responses(
        (status = 200, description = "Subjects required before this one", body = Vec<RequirementResponse>),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn get_requirements(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Path(subject_id): Path<i32>,
) -> Result<(StatusCode, Json<Vec<RequirementResponse>>), ApiError> {
    let subject_repo = SubjectRepository::new(state.db.clone());
    subject_repo
        .find_by_id(subject_id)
        .await
        .map_err(internal_error("Failed to fetch subject"))?
        .ok_or_else(|| not_found("Subject"))?;

    let requirements = RequirementRepository::new(state.db.clone())
        .find_by_subject(subject_id)
        .await
        .map_err(internal_error("Failed to fetch requirements"))?;

    let required_ids = requirements.iter().map(|r| r.required_subject_id).collect();
    let required: HashMap<i32, _> = subject_repo
        .find_by_ids(required_ids)
        .await
        .map_err(internal_error("Failed to fetch subjects"))?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let response = requirements
        .into_iter()
        .map(|r| {
            let subject = required.get(&r.required_subject_id);
            RequirementResponse::new(r, subject)
        })
        .collect();

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/subjects/{subject_id}/requirements",
    params(("subject_id" = i32, Path, description = "Subject id")),
    request_body = CreateRequirementRequest,
    responses(
        (status = 201, description = "Requirement added", body = RequirementResponse),
        (status = 400, description = "A subject cannot require itself"),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Requirement already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_requirement(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(subject_id): Path<i32>,
    Json(payload): Json<CreateRequirementRequest>,
) -> Result<(StatusCode, Json<RequirementResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "manage requirements")?;
    if payload.required_subject_id == subject_id {
        return Err((
            StatusCode::BAD_REQUEST,
            "A subject cannot require itself".to_string(),
        ));
    }

    let subject_repo = SubjectRepository::new(state.db.clone());
    subject_repo
        .find_by_id(subject_id)
        .await
        .map_err(internal_error("Failed to fetch subject"))?
        .ok_or_else(|| not_found("Subject"))?;
    let required = subject_repo
        .find_by_id(payload.required_subject_id)
        .await
        .map_err(internal_error("Failed to fetch subject"))?
        .ok_or_else(|| not_found("Required subject"))?;

    let requirement_repo = RequirementRepository::new(state.db.clone());
    if requirement_repo
        .find_pair(subject_id, payload.required_subject_id)
        .await
        .map_err(internal_error("Failed to fetch requirements"))?
        .is_some()
    {
        return Err((
            StatusCode::CONFLICT,
            format!("Subject already requires {}", required.code),
        ));
    }

    let requirement = requirement_repo
        .create(subject_id, payload.required_subject_id)
        .await
        .map_err(internal_error("Failed to create requirement"))?;

    tracing::info!(
        subject_id,
        required_subject_id = payload.required_subject_id,
        "Requirement added"
    );
    Ok((
        StatusCode::CREATED,
        Json(RequirementResponse::new(requirement, Some(&required))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/requirements/{requirement_id}",
    params(("requirement_id" = i32, Path, description = "Requirement id")),
    responses(
        (status = 204, description = "Requirement removed"),
        (status = 404, description = "Requirement not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn delete_requirement(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(requirement_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "manage requirements")?;

    let deleted = RequirementRepository::new(state.db.clone())
        .delete(requirement_id)
        .await
        .map_err(internal_error("Failed to delete requirement"))?;
    if !deleted {
        return Err(not_found("Requirement"));
    }

    Ok(StatusCode::NO_CONTENT)
}
