use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::routes::student_subjects::dto::StudentSubjectResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentCounts {
    pub active: u64,
    pub inactive: u64,
    pub graduated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectStatusCounts {
    pub cursando: u64,
    pub regular: u64,
    pub acreditada: u64,
    pub libre: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub total_careers: usize,
    pub total_subjects: usize,
    pub total_enrollments: u64,
    pub students: StudentCounts,
    pub student_subjects: SubjectStatusCounts,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Number of entries, 1-100
    pub limit: Option<u64>,
}

impl ActivityQuery {
    pub fn resolve(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default).clamp(1, 100)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub entries: Vec<StudentSubjectResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_limit_is_clamped() {
        assert_eq!(ActivityQuery { limit: None }.resolve(20), 20);
        assert_eq!(ActivityQuery { limit: Some(0) }.resolve(20), 1);
        assert_eq!(ActivityQuery { limit: Some(500) }.resolve(20), 100);
    }
}
