use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{requirement, subject};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubjectRequest {
    #[schema(example = 1)]
    pub career_id: i32,

    #[schema(example = "MAT201")]
    pub code: String,

    #[schema(example = "Análisis Matemático II")]
    pub name: String,

    #[schema(example = 2)]
    pub year: i32,

    #[schema(example = 96)]
    pub hours: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSubjectRequest {
    pub career_id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub hours: Option<i32>,
}

/// Year of study and credit hours must be positive.
pub fn validate_year_and_hours(year: Option<i32>, hours: Option<i32>) -> Result<(), String> {
    if year.is_some_and(|y| y < 1) {
        return Err("Year must be a positive integer".to_string());
    }
    if hours.is_some_and(|h| h < 1) {
        return Err("Hours must be a positive integer".to_string());
    }
    Ok(())
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() || self.name.trim().is_empty() {
            return Err("Code and name are required".to_string());
        }
        validate_year_and_hours(Some(self.year), Some(self.hours))
    }
}

impl UpdateSubjectRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_year_and_hours(self.year, self.hours)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubjectQueryParams {
    pub career_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub id: i32,
    pub career_id: i32,
    pub code: String,
    pub name: String,
    pub year: i32,
    pub hours: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<subject::Model> for SubjectResponse {
    fn from(subject: subject::Model) -> Self {
        Self {
            id: subject.id,
            career_id: subject.career_id,
            code: subject.code,
            name: subject.name,
            year: subject.year,
            hours: subject.hours,
            created_at: subject.created_at,
            updated_at: subject.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequirementRequest {
    /// Subject that must be satisfied first
    #[schema(example = 1)]
    pub required_subject_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementResponse {
    pub id: i32,
    pub subject_id: i32,
    pub required_subject_id: i32,
    pub required_code: Option<String>,
    pub required_name: Option<String>,
}

impl RequirementResponse {
    pub fn new(requirement: requirement::Model, required: Option<&subject::Model>) -> Self {
        Self {
            id: requirement.id,
            subject_id: requirement.subject_id,
            required_subject_id: requirement.required_subject_id,
            required_code: required.map(|s| s.code.clone()),
            required_name: required.map(|s| s.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_and_hours_must_be_positive() {
        assert!(validate_year_and_hours(Some(1), Some(64)).is_ok());
        assert!(validate_year_and_hours(None, None).is_ok());
        assert!(validate_year_and_hours(Some(0), None).is_err());
        assert!(validate_year_and_hours(None, Some(-4)).is_err());
    }
}
