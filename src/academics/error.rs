use thiserror::Error;

use super::evaluator::missing_subject_message;
use super::store::StoreError;
use crate::entities::subject;

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Carries every unmet required subject, not only the first one.
    #[error("{}", render_missing(.0))]
    PrerequisiteNotMet(Vec<subject::Model>),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl EnrollmentError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        EnrollmentError::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EnrollmentError::Validation(message.into())
    }

    /// One user-facing line per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            EnrollmentError::PrerequisiteNotMet(missing) => {
                missing.iter().map(missing_subject_message).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

fn render_missing(missing: &[subject::Model]) -> String {
    missing
        .iter()
        .map(missing_subject_message)
        .collect::<Vec<_>>()
        .join("\n")
}
