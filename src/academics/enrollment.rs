//! Lifecycle of a student in a subject:
//! `NONE -> CURSANDO -> {ACREDITADA | LIBRE}`, with `REGULAR` as the
//! course-completed-exam-pending standing.
//!
//! Prerequisites are only checked when enrolling. Later status changes are
//! validated for shape (status value, grade range) but never re-check
//! correlatividades.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::error::EnrollmentError;
use super::evaluator::{Eligibility, PrerequisiteEvaluator, is_current, today};
use super::record::{AcademicRecord, summarize};
use super::store::{EntityStore, NewEnrollment, NewStudentSubject, StudentSubjectPatch};
use crate::entities::sea_orm_active_enums::{EnrollmentType, StudentSubjectStatus};
use crate::entities::{enrollment, student, student_subject, subject};

pub const MIN_GRADE: i32 = 4;
pub const MAX_GRADE: i32 = 10;

#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    pub student_id: i32,
    pub subject_id: i32,
    pub enrollment_type: EnrollmentType,
    pub exam_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct EnrollmentOutcome {
    pub enrollment: enrollment::Model,
    pub subject: subject::Model,
    /// Present for `cursada` enrollments only.
    pub student_subject: Option<student_subject::Model>,
}

/// Input of [`EnrollmentService::update_status`]. See
/// [`StudentSubjectPatch`] for the meaning of the nested options.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub status: String,
    pub grade: Option<Option<i32>>,
    pub date: Option<Option<NaiveDate>>,
    pub book: Option<Option<String>>,
    pub folio: Option<Option<String>>,
}

/// Direct entry of a record, e.g. transcribing an exam act.
#[derive(Debug, Clone)]
pub struct RecordEntry {
    pub student_id: i32,
    pub subject_id: i32,
    pub status: String,
    pub grade: Option<i32>,
    pub date: Option<NaiveDate>,
    pub book: Option<String>,
    pub folio: Option<String>,
}

pub fn parse_status(value: &str) -> Result<StudentSubjectStatus, EnrollmentError> {
    StudentSubjectStatus::parse(value).ok_or_else(|| {
        EnrollmentError::validation(format!(
            "Invalid status '{}': expected one of cursando, regular, acreditada, libre",
            value
        ))
    })
}

pub fn validate_grade(grade: i32) -> Result<(), EnrollmentError> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(EnrollmentError::validation(format!(
            "Grade {} is out of range ({}-{})",
            grade, MIN_GRADE, MAX_GRADE
        )));
    }
    Ok(())
}

/// `acreditada` needs a grade and `regular` needs the date its 24-month
/// validity runs from.
fn require_fields_for(
    status: StudentSubjectStatus,
    grade: Option<i32>,
    date: Option<NaiveDate>,
) -> Result<(), EnrollmentError> {
    match status {
        StudentSubjectStatus::Acreditada if grade.is_none() => Err(EnrollmentError::validation(
            "A grade is required to mark a subject as acreditada",
        )),
        StudentSubjectStatus::Regular if date.is_none() => Err(EnrollmentError::validation(
            "A date is required to mark a subject as regular",
        )),
        _ => Ok(()),
    }
}

pub struct EnrollmentService {
    store: Arc<dyn EntityStore>,
    evaluator: PrerequisiteEvaluator,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        let evaluator = PrerequisiteEvaluator::new(store.clone());
        Self { store, evaluator }
    }

    async fn find_subject(&self, subject_id: i32) -> Result<subject::Model, EnrollmentError> {
        self.store
            .get_subject(subject_id)
            .await?
            .ok_or_else(|| EnrollmentError::not_found("subject", subject_id))
    }

    async fn find_student(&self, student_id: i32) -> Result<student::Model, EnrollmentError> {
        self.store
            .get_student(student_id)
            .await?
            .ok_or_else(|| EnrollmentError::not_found("student", student_id))
    }

    pub async fn check_eligibility(
        &self,
        student_id: i32,
        subject_id: i32,
    ) -> Result<Eligibility, EnrollmentError> {
        self.find_subject(subject_id).await?;
        self.find_student(student_id).await?;
        Ok(self.evaluator.is_eligible(student_id, subject_id).await?)
    }

    /// Both enrollment types are gated by prerequisites. A `cursada` also
    /// opens a `cursando` record; a rejected request writes nothing.
    pub async fn enroll(
        &self,
        request: EnrollmentRequest,
    ) -> Result<EnrollmentOutcome, EnrollmentError> {
        self.enroll_on(request, today()).await
    }

    pub async fn enroll_on(
        &self,
        request: EnrollmentRequest,
        today: NaiveDate,
    ) -> Result<EnrollmentOutcome, EnrollmentError> {
        let EnrollmentRequest {
            student_id,
            subject_id,
            enrollment_type,
            exam_date,
        } = request;

        let subject = self.find_subject(subject_id).await?;
        self.find_student(student_id).await?;

        if enrollment_type == EnrollmentType::Examen && exam_date.is_none() {
            return Err(EnrollmentError::validation(
                "exam_date is required for examen enrollments",
            ));
        }

        let records = self.store.get_student_subjects(student_id).await?;

        if enrollment_type == EnrollmentType::Cursada {
            if let Some(current) = records
                .iter()
                .find(|r| r.subject_id == subject_id && is_current(r, today))
            {
                return Err(EnrollmentError::validation(format!(
                    "Student already has {} - {} as {}",
                    subject.code,
                    subject.name,
                    current.status.as_str()
                )));
            }
        }

        let eligibility = self
            .evaluator
            .check_records(subject_id, &records, today)
            .await?;
        if !eligibility.eligible {
            tracing::warn!(
                student_id,
                subject_id,
                missing = eligibility.missing.len(),
                "Enrollment rejected: prerequisites not met"
            );
            return Err(EnrollmentError::PrerequisiteNotMet(eligibility.missing));
        }

        let outcome = match enrollment_type {
            EnrollmentType::Cursada => {
                let (enrollment, student_subject) = self
                    .store
                    .create_cursada(
                        NewEnrollment {
                            student_id,
                            subject_id,
                            enrollment_type,
                            exam_date: None,
                        },
                        NewStudentSubject::cursando(student_id, subject_id),
                    )
                    .await?;
                EnrollmentOutcome {
                    enrollment,
                    subject,
                    student_subject: Some(student_subject),
                }
            }
            EnrollmentType::Examen => {
                let enrollment = self
                    .store
                    .create_enrollment(NewEnrollment {
                        student_id,
                        subject_id,
                        enrollment_type,
                        exam_date,
                    })
                    .await?;
                EnrollmentOutcome {
                    enrollment,
                    subject,
                    student_subject: None,
                }
            }
        };

        tracing::info!(
            student_id,
            subject_id,
            enrollment_id = outcome.enrollment.id,
            enrollment_type = ?enrollment_type,
            "Enrollment created"
        );

        Ok(outcome)
    }

    /// Applies a status change. `acreditada` needs a grade and `regular` a
    /// date, either supplied now or already stored on the row.
    pub async fn update_status(
        &self,
        student_subject_id: i32,
        update: StatusUpdate,
    ) -> Result<student_subject::Model, EnrollmentError> {
        let current = self
            .store
            .get_student_subject(student_subject_id)
            .await?
            .ok_or_else(|| EnrollmentError::not_found("student subject", student_subject_id))?;

        let status = parse_status(&update.status)?;
        if let Some(Some(grade)) = update.grade {
            validate_grade(grade)?;
        }
        let effective_grade = update.grade.unwrap_or(current.grade);
        let effective_date = update.date.unwrap_or(current.date);
        require_fields_for(status, effective_grade, effective_date)?;

        let patch = StudentSubjectPatch {
            status: Some(status),
            grade: update.grade,
            date: update.date,
            book: update.book,
            folio: update.folio,
        };

        let updated = self
            .store
            .update_student_subject(student_subject_id, patch)
            .await?
            .ok_or_else(|| EnrollmentError::not_found("student subject", student_subject_id))?;

        tracing::info!(
            student_subject_id,
            from = current.status.as_str(),
            to = updated.status.as_str(),
            "Student subject status updated"
        );

        Ok(updated)
    }

    pub async fn record_student_subject(
        &self,
        entry: RecordEntry,
    ) -> Result<student_subject::Model, EnrollmentError> {
        let status = parse_status(&entry.status)?;
        if let Some(grade) = entry.grade {
            validate_grade(grade)?;
        }
        require_fields_for(status, entry.grade, entry.date)?;

        self.find_subject(entry.subject_id).await?;
        self.find_student(entry.student_id).await?;

        let created = self
            .store
            .add_student_subject(NewStudentSubject {
                student_id: entry.student_id,
                subject_id: entry.subject_id,
                status,
                grade: entry.grade,
                date: entry.date,
                book: entry.book,
                folio: entry.folio,
            })
            .await?;

        tracing::info!(
            student_subject_id = created.id,
            student_id = created.student_id,
            subject_id = created.subject_id,
            status = status.as_str(),
            "Student subject recorded"
        );

        Ok(created)
    }

    /// Removes the enrollment row only. Records opened by the enrollment stay.
    pub async fn delete_enrollment(&self, enrollment_id: i32) -> Result<(), EnrollmentError> {
        let enrollment = self
            .store
            .get_enrollment(enrollment_id)
            .await?
            .ok_or_else(|| EnrollmentError::not_found("enrollment", enrollment_id))?;

        if !self.store.delete_enrollment(enrollment_id).await? {
            return Err(EnrollmentError::not_found("enrollment", enrollment_id));
        }
        tracing::info!(
            enrollment_id,
            student_id = enrollment.student_id,
            subject_id = enrollment.subject_id,
            "Enrollment deleted"
        );
        Ok(())
    }

    /// Subjects of the student's career with no current record whose
    /// prerequisites are met, ordered by year and code.
    pub async fn available_subjects(
        &self,
        student_id: i32,
    ) -> Result<Vec<subject::Model>, EnrollmentError> {
        let student = self.find_student(student_id).await?;
        let subjects = self.store.get_subjects_by_career(student.career_id).await?;
        let records = self.store.get_student_subjects(student_id).await?;
        let today = today();

        let mut available = Vec::new();
        for subject in subjects {
            let taken = records
                .iter()
                .any(|r| r.subject_id == subject.id && is_current(r, today));
            if taken {
                continue;
            }
            if self
                .evaluator
                .check_records(subject.id, &records, today)
                .await?
                .eligible
            {
                available.push(subject);
            }
        }

        available.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.code.cmp(&b.code)));
        Ok(available)
    }

    pub async fn academic_record(
        &self,
        student_id: i32,
    ) -> Result<AcademicRecord, EnrollmentError> {
        let student = self.find_student(student_id).await?;
        let career_subjects = self.store.get_subjects_by_career(student.career_id).await?;
        let records = self.store.get_student_subjects(student_id).await?;

        let mut subjects: HashMap<i32, subject::Model> = career_subjects
            .iter()
            .map(|s| (s.id, s.clone()))
            .collect();
        for record in &records {
            if !subjects.contains_key(&record.subject_id) {
                if let Some(extra) = self.store.get_subject(record.subject_id).await? {
                    subjects.insert(extra.id, extra);
                }
            }
        }

        Ok(summarize(&student, &career_subjects, &subjects, &records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academics::memory_store::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: EnrollmentService,
        student: i32,
        algebra: i32,
        analysis: i32,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let career = store.insert_career("TSDS");
        let student = store.insert_student(career, "L-1001");
        let algebra = store.insert_subject(career, "MAT101", "Álgebra I", 1);
        let analysis = store.insert_subject(career, "MAT201", "Análisis II", 2);
        store.insert_requirement(analysis, algebra);
        let service = EnrollmentService::new(store.clone());
        Fixture {
            store,
            service,
            student,
            algebra,
            analysis,
        }
    }

    fn cursada(student_id: i32, subject_id: i32) -> EnrollmentRequest {
        EnrollmentRequest {
            student_id,
            subject_id,
            enrollment_type: EnrollmentType::Cursada,
            exam_date: None,
        }
    }

    fn status(value: &str) -> StatusUpdate {
        StatusUpdate {
            status: value.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_enroll_rejected_writes_nothing() {
        let f = fixture();

        let err = f
            .service
            .enroll(cursada(f.student, f.analysis))
            .await
            .unwrap_err();

        match &err {
            EnrollmentError::PrerequisiteNotMet(missing) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].code, "MAT101");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.messages(),
            vec!["Falta regularizar materia MAT101 - Álgebra I".to_string()]
        );
        assert!(f.store.enrollments().is_empty());
        assert!(f.store.student_subjects().is_empty());
    }

    #[tokio::test]
    async fn test_enroll_after_prerequisite_accredited() {
        let f = fixture();
        f.service
            .record_student_subject(RecordEntry {
                student_id: f.student,
                subject_id: f.algebra,
                status: "acreditada".to_string(),
                grade: Some(8),
                date: None,
                book: None,
                folio: None,
            })
            .await
            .unwrap();

        let outcome = f
            .service
            .enroll(cursada(f.student, f.analysis))
            .await
            .unwrap();

        assert_eq!(outcome.enrollment.enrollment_type, EnrollmentType::Cursada);
        assert_eq!(outcome.subject.code, "MAT201");
        let created = outcome.student_subject.expect("cursada opens a record");
        assert_eq!(created.status, StudentSubjectStatus::Cursando);
        assert_eq!(created.grade, None);
        assert_eq!(created.date, None);
        assert_eq!(created.book, None);
        assert_eq!(created.folio, None);

        assert_eq!(f.store.enrollments().len(), 1);
        let opened: Vec<_> = f
            .store
            .student_subjects()
            .into_iter()
            .filter(|r| r.subject_id == f.analysis)
            .collect();
        assert_eq!(opened.len(), 1);
    }

    #[tokio::test]
    async fn test_enroll_unknown_subject_is_not_found() {
        let f = fixture();
        let err = f.service.enroll(cursada(f.student, 999)).await.unwrap_err();
        assert!(matches!(
            err,
            EnrollmentError::NotFound { entity: "subject", id: 999 }
        ));
    }

    #[tokio::test]
    async fn test_enroll_unknown_student_is_not_found() {
        let f = fixture();
        let err = f.service.enroll(cursada(999, f.algebra)).await.unwrap_err();
        assert!(matches!(
            err,
            EnrollmentError::NotFound { entity: "student", .. }
        ));
    }

    #[tokio::test]
    async fn test_cursada_twice_is_rejected() {
        let f = fixture();
        f.service.enroll(cursada(f.student, f.algebra)).await.unwrap();

        let err = f
            .service
            .enroll(cursada(f.student, f.algebra))
            .await
            .unwrap_err();

        assert!(matches!(err, EnrollmentError::Validation(_)));
        assert_eq!(f.store.enrollments().len(), 1);
        assert_eq!(f.store.student_subjects().len(), 1);
    }

    #[tokio::test]
    async fn test_libre_allows_new_cursada() {
        let f = fixture();
        f.store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Libre, None, None);

        f.service.enroll(cursada(f.student, f.algebra)).await.unwrap();
        assert_eq!(f.store.student_subjects().len(), 2);
    }

    #[tokio::test]
    async fn test_examen_requires_date() {
        let f = fixture();
        let err = f
            .service
            .enroll(EnrollmentRequest {
                student_id: f.student,
                subject_id: f.algebra,
                enrollment_type: EnrollmentType::Examen,
                exam_date: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
        assert!(f.store.enrollments().is_empty());
    }

    #[tokio::test]
    async fn test_examen_records_enrollment_only() {
        let f = fixture();
        let exam_date = NaiveDate::from_ymd_opt(2025, 7, 14);
        let outcome = f
            .service
            .enroll(EnrollmentRequest {
                student_id: f.student,
                subject_id: f.algebra,
                enrollment_type: EnrollmentType::Examen,
                exam_date,
            })
            .await
            .unwrap();

        assert_eq!(outcome.enrollment.exam_date, exam_date);
        assert!(outcome.student_subject.is_none());
        assert!(f.store.student_subjects().is_empty());
    }

    #[tokio::test]
    async fn test_examen_is_gated_by_prerequisites() {
        let f = fixture();
        let err = f
            .service
            .enroll(EnrollmentRequest {
                student_id: f.student,
                subject_id: f.analysis,
                enrollment_type: EnrollmentType::Examen,
                exam_date: NaiveDate::from_ymd_opt(2025, 7, 14),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::PrerequisiteNotMet(_)));
    }

    #[tokio::test]
    async fn test_accredit_without_grade_fails() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Cursando, None, None);

        let err = f
            .service
            .update_status(id, status("acreditada"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_accredit_with_grade_persists() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Cursando, None, None);

        let updated = f
            .service
            .update_status(
                id,
                StatusUpdate {
                    grade: Some(Some(7)),
                    ..status("acreditada")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, StudentSubjectStatus::Acreditada);
        assert_eq!(updated.grade, Some(7));
        let stored = f.store.student_subjects();
        assert_eq!(stored[0].grade, Some(7));
    }

    #[tokio::test]
    async fn test_grade_out_of_range_fails() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Cursando, None, None);

        for grade in [11, 3] {
            let err = f
                .service
                .update_status(
                    id,
                    StatusUpdate {
                        grade: Some(Some(grade)),
                        ..status("acreditada")
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, EnrollmentError::Validation(_)));
        }
        assert_eq!(f.store.student_subjects()[0].status, StudentSubjectStatus::Cursando);
    }

    #[tokio::test]
    async fn test_unknown_status_fails() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Cursando, None, None);

        let err = f
            .service
            .update_status(id, status("aprobada"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_must_match_stored_spelling() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Cursando, None, None);

        for value in ["Acreditada", " acreditada ", "LIBRE"] {
            let err = f
                .service
                .update_status(
                    id,
                    StatusUpdate {
                        grade: Some(Some(8)),
                        ..status(value)
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, EnrollmentError::Validation(_)), "{value}");
        }
        assert_eq!(f.store.student_subjects()[0].status, StudentSubjectStatus::Cursando);
    }

    #[tokio::test]
    async fn test_regular_requires_date() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Cursando, None, None);

        let err = f
            .service
            .update_status(id, status("regular"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
        assert_eq!(f.store.student_subjects()[0].status, StudentSubjectStatus::Cursando);

        let date = NaiveDate::from_ymd_opt(2025, 3, 1);
        let updated = f
            .service
            .update_status(
                id,
                StatusUpdate {
                    date: Some(date),
                    ..status("regular")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, StudentSubjectStatus::Regular);
        assert_eq!(updated.date, date);
    }

    #[tokio::test]
    async fn test_regular_cannot_clear_its_date() {
        let f = fixture();
        let id = f.store.insert_record(
            f.student,
            f.algebra,
            StudentSubjectStatus::Regular,
            None,
            NaiveDate::from_ymd_opt(2025, 3, 1),
        );

        f.service.update_status(id, status("regular")).await.unwrap();

        let err = f
            .service
            .update_status(
                id,
                StatusUpdate {
                    date: Some(None),
                    ..status("regular")
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_status(404, status("libre"))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stored_grade_satisfies_accreditation() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Regular, Some(6), None);

        let updated = f
            .service
            .update_status(id, status("acreditada"))
            .await
            .unwrap();
        assert_eq!(updated.grade, Some(6));
    }

    #[tokio::test]
    async fn test_explicit_null_clears_fields() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Regular, Some(6), None);

        let updated = f
            .service
            .update_status(
                id,
                StatusUpdate {
                    grade: Some(None),
                    book: Some(Some("L3".to_string())),
                    ..status("libre")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, StudentSubjectStatus::Libre);
        assert_eq!(updated.grade, None);
        assert_eq!(updated.book.as_deref(), Some("L3"));
    }

    #[tokio::test]
    async fn test_status_update_skips_prerequisites() {
        let f = fixture();
        let id = f
            .store
            .insert_record(f.student, f.analysis, StudentSubjectStatus::Cursando, None, None);

        let updated = f
            .service
            .update_status(
                id,
                StatusUpdate {
                    grade: Some(Some(9)),
                    ..status("acreditada")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, StudentSubjectStatus::Acreditada);
    }

    #[tokio::test]
    async fn test_delete_enrollment_keeps_record() {
        let f = fixture();
        let outcome = f.service.enroll(cursada(f.student, f.algebra)).await.unwrap();

        f.service
            .delete_enrollment(outcome.enrollment.id)
            .await
            .unwrap();

        assert!(f.store.enrollments().is_empty());
        assert_eq!(f.store.student_subjects().len(), 1);

        let err = f
            .service
            .delete_enrollment(outcome.enrollment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_unavailable() {
        let f = fixture();
        f.store.fail_next_calls(true);

        let err = f
            .service
            .enroll(cursada(f.student, f.algebra))
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_available_subjects() {
        let f = fixture();
        let available = f.service.available_subjects(f.student).await.unwrap();
        let codes: Vec<_> = available.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["MAT101"]);

        f.store
            .insert_record(f.student, f.algebra, StudentSubjectStatus::Acreditada, Some(8), None);
        let available = f.service.available_subjects(f.student).await.unwrap();
        let codes: Vec<_> = available.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["MAT201"]);
    }

    #[tokio::test]
    async fn test_record_entry_validates_grade() {
        let f = fixture();
        let err = f
            .service
            .record_student_subject(RecordEntry {
                student_id: f.student,
                subject_id: f.algebra,
                status: "acreditada".to_string(),
                grade: None,
                date: None,
                book: None,
                folio: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
        assert!(f.store.student_subjects().is_empty());
    }

    #[tokio::test]
    async fn test_record_entry_regular_needs_date() {
        let f = fixture();
        let entry = RecordEntry {
            student_id: f.student,
            subject_id: f.algebra,
            status: "regular".to_string(),
            grade: None,
            date: None,
            book: None,
            folio: None,
        };

        let err = f
            .service
            .record_student_subject(entry.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::Validation(_)));
        assert!(f.store.student_subjects().is_empty());

        let created = f
            .service
            .record_student_subject(RecordEntry {
                date: NaiveDate::from_ymd_opt(2025, 3, 1),
                ..entry
            })
            .await
            .unwrap();
        assert_eq!(created.status, StudentSubjectStatus::Regular);
    }
}
