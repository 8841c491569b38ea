use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    CreateUserRequest, UpdateUserRequest, UserListResponse, UserQueryParams, UserResponse,
};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::{AuthClaims, require_role};
use crate::repositories::{UserRepository, UserUpdate};
use crate::routes::{ApiError, internal_error, not_found};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", post(create_user).get(get_all_users))
        .route(
            "/api/v1/users/{user_id}",
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to hash password: {}", e),
        )
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "create users")?;
    payload.validate().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let user_repo = UserRepository::new(state.db.clone());
    if user_repo
        .find_by_email(&payload.email)
        .await
        .map_err(internal_error("Database error"))?
        .is_some()
    {
        return Err((
            StatusCode::CONFLICT,
            format!("Email {} is already in use", payload.email),
        ));
    }

    let hashed_password = hash_password(&payload.password)?;
    let user = user_repo
        .create(payload.email, hashed_password, payload.full_name, payload.role)
        .await
        .map_err(internal_error("Failed to create user"))?;

    tracing::info!(user_id = user.id, role = ?user.role, created_by = claims.user_id, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserQueryParams),
    responses(
        (status = 200, description = "List of users", body = UserListResponse),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_all_users(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(params): Query<UserQueryParams>,
) -> Result<(StatusCode, Json<UserListResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "list users")?;

    let users = UserRepository::new(state.db.clone())
        .find_all(params.role)
        .await
        .map_err(internal_error("Failed to fetch users"))?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    let total = users.len();

    Ok((StatusCode::OK, Json(UserListResponse { users, total })))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(user_id): Path<i32>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "view users")?;

    let user = UserRepository::new(state.db.clone())
        .find_by_id(user_id)
        .await
        .map_err(internal_error("Failed to fetch user"))?
        .ok_or_else(|| not_found("User"))?;

    Ok((StatusCode::OK, Json(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "update users")?;

    let user_repo = UserRepository::new(state.db.clone());
    user_repo
        .find_by_id(user_id)
        .await
        .map_err(internal_error("Failed to fetch user"))?
        .ok_or_else(|| not_found("User"))?;

    if let Some(email) = &payload.email {
        let taken = user_repo
            .find_by_email(email)
            .await
            .map_err(internal_error("Database error"))?;
        if taken.is_some_and(|u| u.id != user_id) {
            return Err((
                StatusCode::CONFLICT,
                format!("Email {} is already in use", email),
            ));
        }
    }

    let password_hash = match &payload.password {
        Some(password) if password.len() < 8 => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Password must be at least 8 characters".to_string(),
            ));
        }
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = user_repo
        .update(
            user_id,
            UserUpdate {
                email: payload.email,
                password_hash,
                full_name: payload.full_name,
                role: payload.role,
            },
        )
        .await
        .map_err(internal_error("Failed to update user"))?;

    Ok((StatusCode::OK, Json(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted along with its student record"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_role(&claims, &[RoleEnum::Admin], "delete users")?;
    if claims.user_id == user_id {
        return Err((
            StatusCode::BAD_REQUEST,
            "You cannot delete your own account".to_string(),
        ));
    }

    let deleted = UserRepository::new(state.db.clone())
        .delete(user_id)
        .await
        .map_err(internal_error("Failed to delete user"))?;
    if !deleted {
        return Err(not_found("User"));
    }

    tracing::info!(user_id, deleted_by = claims.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
