use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::career;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCareerRequest {
    #[schema(example = "Tecnicatura Superior en Desarrollo de Software")]
    pub name: String,

    #[schema(example = "TSDS")]
    pub code: String,

    pub description: Option<String>,

    #[schema(example = 3)]
    pub duration_years: Option<i32>,
}

impl CreateCareerRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.code.trim().is_empty() {
            return Err("Name and code are required".to_string());
        }
        if self.duration_years.is_some_and(|years| years < 1) {
            return Err("Duration must be at least one year".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCareerRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub duration_years: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CareerResponse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub duration_years: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<career::Model> for CareerResponse {
    fn from(career: career::Model) -> Self {
        Self {
            id: career.id,
            name: career.name,
            code: career.code,
            description: career.description,
            duration_years: career.duration_years,
            created_at: career.created_at,
            updated_at: career.updated_at,
        }
    }
}
