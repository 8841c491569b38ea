use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::entities::sea_orm_active_enums::{EnrollmentType, StudentSubjectStatus};
use crate::entities::{enrollment, requirement, student, student_subject, subject};

/// Persistence failure. Never retried by the callers.
#[derive(Debug, Error)]
#[error("store unavailable: {0}")]
pub struct StoreError(pub String);

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError(format!("{err:#}"))
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub student_id: i32,
    pub subject_id: i32,
    pub enrollment_type: EnrollmentType,
    pub exam_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudentSubject {
    pub student_id: i32,
    pub subject_id: i32,
    pub status: StudentSubjectStatus,
    pub grade: Option<i32>,
    pub date: Option<NaiveDate>,
    pub book: Option<String>,
    pub folio: Option<String>,
}

impl NewStudentSubject {
    /// The row a `cursada` enrollment materializes.
    pub fn cursando(student_id: i32, subject_id: i32) -> Self {
        Self {
            student_id,
            subject_id,
            status: StudentSubjectStatus::Cursando,
            grade: None,
            date: None,
            book: None,
            folio: None,
        }
    }
}

/// Partial update of a student-subject row.
///
/// The outer `Option` tells whether a field was supplied at all; for nullable
/// columns the inner `Option` carries the new value, `None` clearing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentSubjectPatch {
    pub status: Option<StudentSubjectStatus>,
    pub grade: Option<Option<i32>>,
    pub date: Option<Option<NaiveDate>>,
    pub book: Option<Option<String>>,
    pub folio: Option<Option<String>>,
}

impl StudentSubjectPatch {
    /// Applies the supplied fields to `model` and refreshes `updated_at`.
    pub fn apply(&self, model: &mut student_subject::Model) {
        if let Some(status) = self.status {
            model.status = status;
        }
        if let Some(grade) = self.grade {
            model.grade = grade;
        }
        if let Some(date) = self.date {
            model.date = date;
        }
        if let Some(book) = &self.book {
            model.book = book.clone();
        }
        if let Some(folio) = &self.folio {
            model.folio = folio.clone();
        }
        model.updated_at = Utc::now().naive_utc();
    }
}

/// The slice of persistence the enrollment rules depend on.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_subject(&self, id: i32) -> Result<Option<subject::Model>, StoreError>;

    async fn get_subjects_by_career(&self, career_id: i32)
    -> Result<Vec<subject::Model>, StoreError>;

    async fn get_student(&self, id: i32) -> Result<Option<student::Model>, StoreError>;

    /// Direct requirements of `subject_id` (edges leaving the subject).
    async fn get_requirements(&self, subject_id: i32)
    -> Result<Vec<requirement::Model>, StoreError>;

    async fn get_student_subjects(
        &self,
        student_id: i32,
    ) -> Result<Vec<student_subject::Model>, StoreError>;

    async fn get_student_subject(
        &self,
        id: i32,
    ) -> Result<Option<student_subject::Model>, StoreError>;

    async fn create_enrollment(&self, data: NewEnrollment)
    -> Result<enrollment::Model, StoreError>;

    /// Writes a `cursada` enrollment together with its student-subject row.
    /// Either both rows are stored or neither is.
    async fn create_cursada(
        &self,
        enrollment: NewEnrollment,
        student_subject: NewStudentSubject,
    ) -> Result<(enrollment::Model, student_subject::Model), StoreError>;

    async fn add_student_subject(
        &self,
        data: NewStudentSubject,
    ) -> Result<student_subject::Model, StoreError>;

    /// Returns `None` when the row does not exist.
    async fn update_student_subject(
        &self,
        id: i32,
        patch: StudentSubjectPatch,
    ) -> Result<Option<student_subject::Model>, StoreError>;

    async fn get_enrollment(&self, id: i32) -> Result<Option<enrollment::Model>, StoreError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_enrollment(&self, id: i32) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_row() -> student_subject::Model {
        let now = Utc::now().naive_utc();
        student_subject::Model {
            id: 1,
            student_id: 1,
            subject_id: 2,
            status: StudentSubjectStatus::Cursando,
            grade: None,
            date: None,
            book: Some("L1".to_string()),
            folio: Some("F10".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_store_is_object_safe() {
        fn _takes_boxed(_: Box<dyn EntityStore>) {}
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut row = sample_row();
        let patch = StudentSubjectPatch {
            status: Some(StudentSubjectStatus::Acreditada),
            grade: Some(Some(8)),
            ..Default::default()
        };
        patch.apply(&mut row);

        assert_eq!(row.status, StudentSubjectStatus::Acreditada);
        assert_eq!(row.grade, Some(8));
        assert_eq!(row.book.as_deref(), Some("L1"));
        assert_eq!(row.folio.as_deref(), Some("F10"));
    }

    #[test]
    fn test_patch_explicit_null_clears() {
        let mut row = sample_row();
        let patch = StudentSubjectPatch {
            book: Some(None),
            date: Some(NaiveDate::from_ymd_opt(2024, 7, 1)),
            ..Default::default()
        };
        patch.apply(&mut row);

        assert_eq!(row.book, None);
        assert_eq!(row.folio.as_deref(), Some("F10"));
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(row.status, StudentSubjectStatus::Cursando);
    }
}
