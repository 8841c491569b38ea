use axum::http::StatusCode;

use crate::academics::EnrollmentError;
use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::repositories::StudentRepository;
use crate::state::AppState;
use crate::utils::jwt::TokenClaims;

pub mod auth;
pub mod careers;
pub mod enrollments;
pub mod health;
pub mod stats;
pub mod student_subjects;
pub mod students;
pub mod subjects;
#[cfg(test)]
pub mod test_support;
pub mod users;

pub type ApiError = (StatusCode, String);

/// Body of every 500 caused by the database. The cause is only logged.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Storage temporarily unavailable";

/// Maps a core failure to its HTTP status. Unmet prerequisites are returned
/// one per line.
pub fn enrollment_error(err: EnrollmentError) -> ApiError {
    match err {
        EnrollmentError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        EnrollmentError::PrerequisiteNotMet(_) | EnrollmentError::Validation(_) => {
            (StatusCode::BAD_REQUEST, err.messages().join("\n"))
        }
        EnrollmentError::StoreUnavailable(e) => {
            tracing::error!("Store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                STORE_UNAVAILABLE_MESSAGE.to_string(),
            )
        }
    }
}

pub fn internal_error(context: &'static str) -> impl Fn(anyhow::Error) -> ApiError {
    move |e| {
        tracing::error!("{}: {:#}", context, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}: {}", context, STORE_UNAVAILABLE_MESSAGE),
        )
    }
}

pub fn not_found(entity: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{} not found", entity))
}

/// Staff may read any student; a student only their own legajo.
pub async fn ensure_student_access(
    state: &AppState,
    claims: &TokenClaims,
    student_id: i32,
) -> Result<(), ApiError> {
    if claims.is_staff() {
        return Ok(());
    }

    let own = StudentRepository::new(state.db.clone())
        .find_by_user_id(claims.user_id)
        .await
        .map_err(internal_error("Failed to load student"))?;

    match own {
        Some(student) if student.id == student_id => Ok(()),
        _ => Err((
            StatusCode::FORBIDDEN,
            "You can only access your own records".to_string(),
        )),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationQuery {
    /// 1-based page number
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PaginationQuery {
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }
}
