use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::academics::{RecordEntry, StatusUpdate};
use crate::entities::sea_orm_active_enums::StudentSubjectStatus;
use crate::entities::{student_subject, subject};
use crate::utils::serde_helpers::double_option;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentSubjectRequest {
    #[schema(example = 1)]
    pub student_id: i32,

    #[schema(example = 3)]
    pub subject_id: i32,

    #[schema(example = "acreditada")]
    pub status: String,

    #[schema(example = 8)]
    pub grade: Option<i32>,

    pub date: Option<NaiveDate>,
    pub book: Option<String>,
    pub folio: Option<String>,
}

impl From<CreateStudentSubjectRequest> for RecordEntry {
    fn from(request: CreateStudentSubjectRequest) -> Self {
        RecordEntry {
            student_id: request.student_id,
            subject_id: request.subject_id,
            status: request.status,
            grade: request.grade,
            date: request.date,
            book: request.book,
            folio: request.folio,
        }
    }
}

/// Status change. Omitted fields keep their stored value, an explicit
/// `null` clears them.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "acreditada")]
    pub status: String,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>, example = 7)]
    pub grade: Option<Option<i32>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub book: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub folio: Option<Option<String>>,
}

impl From<UpdateStatusRequest> for StatusUpdate {
    fn from(request: UpdateStatusRequest) -> Self {
        StatusUpdate {
            status: request.status,
            grade: request.grade,
            date: request.date,
            book: request.book,
            folio: request.folio,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentSubjectResponse {
    pub id: i32,
    pub student_id: i32,
    pub subject_id: i32,
    pub subject_code: Option<String>,
    pub subject_name: Option<String>,
    pub status: StudentSubjectStatus,
    pub grade: Option<i32>,
    pub date: Option<NaiveDate>,
    pub book: Option<String>,
    pub folio: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StudentSubjectResponse {
    pub fn new(record: student_subject::Model, subject: Option<&subject::Model>) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            subject_id: record.subject_id,
            subject_code: subject.map(|s| s.code.clone()),
            subject_name: subject.map(|s| s.name.clone()),
            status: record.status,
            grade: record.grade,
            date: record.date,
            book: record.book,
            folio: record.folio,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<student_subject::Model> for StudentSubjectResponse {
    fn from(record: student_subject::Model) -> Self {
        Self::new(record, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_status_null_clears_absent_keeps() {
        let request: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "libre", "grade": null}"#).unwrap();
        let update = StatusUpdate::from(request);

        assert_eq!(update.status, "libre");
        assert_eq!(update.grade, Some(None));
        assert_eq!(update.date, None);
        assert_eq!(update.book, None);
    }

    #[test]
    fn test_update_status_with_values() {
        let request: UpdateStatusRequest = serde_json::from_str(
            r#"{"status": "acreditada", "grade": 7, "date": "2025-07-15", "book": "L3"}"#,
        )
        .unwrap();

        assert_eq!(request.grade, Some(Some(7)));
        assert_eq!(
            request.date,
            Some(Some(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()))
        );
        assert_eq!(request.book, Some(Some("L3".to_string())));
    }
}
