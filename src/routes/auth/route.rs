use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{LoginRequest, LoginResponse, MeResponse};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::extractor::AuthClaims;
use crate::repositories::{StudentRepository, UserRepository};
use crate::routes::{ApiError, internal_error};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
}

fn invalid_credentials() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        "Invalid email or password".to_string(),
    )
}

/// Login endpoint - returns JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let user = UserRepository::new(state.db.clone())
        .find_by_email(&payload.email)
        .await
        .map_err(internal_error("Database error"))?
        .ok_or_else(invalid_credentials)?;

    let valid = bcrypt::verify(&payload.password, &user.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to verify password: {}", e),
        )
    })?;
    if !valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid_credentials());
    }

    let student_id = if user.role == RoleEnum::Student {
        StudentRepository::new(state.db.clone())
            .find_by_user_id(user.id)
            .await
            .map_err(internal_error("Failed to load student"))?
            .map(|s| s.id)
    } else {
        None
    };

    let access_token = state
        .jwt
        .create_jwt(user.id, &user.full_name, user.role)
        .map_err(internal_error("Failed to create token"))?;

    tracing::info!(user_id = user.id, role = ?user.role, "User logged in");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt.expires_in(),
            user_id: user.id,
            full_name: user.full_name,
            role: user.role,
            student_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Claims of the current token", body = MeResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(AuthClaims(claims): AuthClaims) -> Result<(StatusCode, Json<MeResponse>), ApiError> {
    Ok((
        StatusCode::OK,
        Json(MeResponse {
            user_id: claims.user_id,
            name: claims.name,
            role: claims.role,
            expires_at: claims.exp,
        }),
    ))
}
