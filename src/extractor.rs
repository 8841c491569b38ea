use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::state::AppState;
use crate::utils::jwt::TokenClaims;

/// Verified claims of the bearer token sent with the request.
pub struct AuthClaims(pub TokenClaims);

impl<S> FromRequestParts<S> for AuthClaims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                (
                    StatusCode::UNAUTHORIZED,
                    "Missing or malformed bearer token".to_string(),
                )
            })?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.jwt.decode_jwt(bearer.token()).map_err(|e| {
            tracing::debug!("Rejected token: {:#}", e);
            (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string())
        })?;

        Ok(AuthClaims(claims))
    }
}

/// Fails with 403 unless the caller has one of `roles`.
pub fn require_role(
    claims: &TokenClaims,
    roles: &[RoleEnum],
    action: &str,
) -> Result<(), (StatusCode, String)> {
    if roles.contains(&claims.role) {
        return Ok(());
    }
    let allowed = roles
        .iter()
        .map(|r| format!("{:?}", r).to_lowercase())
        .collect::<Vec<_>>()
        .join("/");
    Err((
        StatusCode::FORBIDDEN,
        format!("Only {} can {}", allowed, action),
    ))
}
