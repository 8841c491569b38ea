//! `SeaORM` active enums. All are persisted as lowercase strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RoleEnum {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "student")]
    Student,
}

impl RoleEnum {
    pub fn is_staff(&self) -> bool {
        matches!(self, RoleEnum::Admin | RoleEnum::Teacher)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "graduated")]
    Graduated,
}

/// Standing of a student in a subject.
///
/// `Regular` means the course was completed but the final exam is pending.
/// It satisfies prerequisites for a limited time (see `academics::evaluator`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum StudentSubjectStatus {
    #[sea_orm(string_value = "cursando")]
    Cursando,
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "acreditada")]
    Acreditada,
    #[sea_orm(string_value = "libre")]
    Libre,
}

impl StudentSubjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentSubjectStatus::Cursando => "cursando",
            StudentSubjectStatus::Regular => "regular",
            StudentSubjectStatus::Acreditada => "acreditada",
            StudentSubjectStatus::Libre => "libre",
        }
    }

    /// Parses the exact persisted string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cursando" => Some(StudentSubjectStatus::Cursando),
            "regular" => Some(StudentSubjectStatus::Regular),
            "acreditada" => Some(StudentSubjectStatus::Acreditada),
            "libre" => Some(StudentSubjectStatus::Libre),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentType {
    #[sea_orm(string_value = "cursada")]
    Cursada,
    #[sea_orm(string_value = "examen")]
    Examen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_subject_status_parse() {
        assert_eq!(
            StudentSubjectStatus::parse("acreditada"),
            Some(StudentSubjectStatus::Acreditada)
        );
        assert_eq!(
            StudentSubjectStatus::parse("libre"),
            Some(StudentSubjectStatus::Libre)
        );
        assert_eq!(StudentSubjectStatus::parse(" Libre "), None);
        assert_eq!(StudentSubjectStatus::parse("ACREDITADA"), None);
        assert_eq!(StudentSubjectStatus::parse("aprobada"), None);
        assert_eq!(StudentSubjectStatus::parse(""), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&StudentSubjectStatus::Cursando).unwrap();
        assert_eq!(json, "\"cursando\"");

        let parsed: EnrollmentType = serde_json::from_str("\"examen\"").unwrap();
        assert_eq!(parsed, EnrollmentType::Examen);
    }
}
