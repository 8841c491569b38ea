//! In-memory [`EntityStore`] used by the tests.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::store::{EntityStore, NewEnrollment, NewStudentSubject, StoreError, StudentSubjectPatch};
use crate::entities::sea_orm_active_enums::{StudentStatus, StudentSubjectStatus};
use crate::entities::{career, enrollment, requirement, student, student_subject, subject};

#[derive(Default)]
struct Tables {
    careers: Vec<career::Model>,
    subjects: Vec<subject::Model>,
    requirements: Vec<requirement::Model>,
    students: Vec<student::Model>,
    student_subjects: Vec<student_subject::Model>,
    enrollments: Vec<enrollment::Model>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every trait call fails with [`StoreError`].
    pub fn fail_next_calls(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError("connection refused".to_string()));
        }
        Ok(())
    }

    pub fn insert_career(&self, code: &str) -> i32 {
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        let now = Utc::now().naive_utc();
        tables.careers.push(career::Model {
            id,
            name: format!("Carrera {code}"),
            code: code.to_string(),
            description: None,
            duration_years: 3,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn insert_subject(&self, career_id: i32, code: &str, name: &str, year: i32) -> i32 {
        self.insert_subject_with_hours(career_id, code, name, year, 96)
    }

    pub fn insert_subject_with_hours(
        &self,
        career_id: i32,
        code: &str,
        name: &str,
        year: i32,
        hours: i32,
    ) -> i32 {
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        let now = Utc::now().naive_utc();
        tables.subjects.push(subject::Model {
            id,
            career_id,
            code: code.to_string(),
            name: name.to_string(),
            year,
            hours,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn insert_requirement(&self, subject_id: i32, required_subject_id: i32) -> i32 {
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        tables.requirements.push(requirement::Model {
            id,
            subject_id,
            required_subject_id,
            created_at: Utc::now().naive_utc(),
        });
        id
    }

    pub fn insert_student(&self, career_id: i32, file_number: &str) -> i32 {
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        let now = Utc::now().naive_utc();
        tables.students.push(student::Model {
            id,
            user_id: id,
            career_id,
            file_number: file_number.to_string(),
            enrollment_date: now.date(),
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn insert_record(
        &self,
        student_id: i32,
        subject_id: i32,
        status: StudentSubjectStatus,
        grade: Option<i32>,
        date: Option<NaiveDate>,
    ) -> i32 {
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        let now = Utc::now().naive_utc();
        tables.student_subjects.push(student_subject::Model {
            id,
            student_id,
            subject_id,
            status,
            grade,
            date,
            book: None,
            folio: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn enrollments(&self) -> Vec<enrollment::Model> {
        self.tables.read().unwrap().enrollments.clone()
    }

    pub fn student_subjects(&self) -> Vec<student_subject::Model> {
        self.tables.read().unwrap().student_subjects.clone()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_subject(&self, id: i32) -> Result<Option<subject::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables.subjects.iter().find(|s| s.id == id).cloned())
    }

    async fn get_subjects_by_career(
        &self,
        career_id: i32,
    ) -> Result<Vec<subject::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables
            .subjects
            .iter()
            .filter(|s| s.career_id == career_id)
            .cloned()
            .collect())
    }

    async fn get_student(&self, id: i32) -> Result<Option<student::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables.students.iter().find(|s| s.id == id).cloned())
    }

    async fn get_requirements(
        &self,
        subject_id: i32,
    ) -> Result<Vec<requirement::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables
            .requirements
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn get_student_subjects(
        &self,
        student_id: i32,
    ) -> Result<Vec<student_subject::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables
            .student_subjects
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn get_student_subject(
        &self,
        id: i32,
    ) -> Result<Option<student_subject::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables.student_subjects.iter().find(|r| r.id == id).cloned())
    }

    async fn create_enrollment(
        &self,
        data: NewEnrollment,
    ) -> Result<enrollment::Model, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        let model = enrollment::Model {
            id,
            student_id: data.student_id,
            subject_id: data.subject_id,
            enrollment_type: data.enrollment_type,
            exam_date: data.exam_date,
            created_at: Utc::now().naive_utc(),
        };
        tables.enrollments.push(model.clone());
        Ok(model)
    }

    async fn create_cursada(
        &self,
        enrollment: NewEnrollment,
        student_subject: NewStudentSubject,
    ) -> Result<(enrollment::Model, student_subject::Model), StoreError> {
        self.check()?;
        let created_enrollment = self.create_enrollment(enrollment).await?;
        let created_record = self.add_student_subject(student_subject).await?;
        Ok((created_enrollment, created_record))
    }

    async fn add_student_subject(
        &self,
        data: NewStudentSubject,
    ) -> Result<student_subject::Model, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().unwrap();
        let id = tables.next_id();
        let now = Utc::now().naive_utc();
        let model = student_subject::Model {
            id,
            student_id: data.student_id,
            subject_id: data.subject_id,
            status: data.status,
            grade: data.grade,
            date: data.date,
            book: data.book,
            folio: data.folio,
            created_at: now,
            updated_at: now,
        };
        tables.student_subjects.push(model.clone());
        Ok(model)
    }

    async fn update_student_subject(
        &self,
        id: i32,
        patch: StudentSubjectPatch,
    ) -> Result<Option<student_subject::Model>, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().unwrap();
        let Some(row) = tables.student_subjects.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        patch.apply(row);
        Ok(Some(row.clone()))
    }

    async fn get_enrollment(&self, id: i32) -> Result<Option<enrollment::Model>, StoreError> {
        self.check()?;
        let tables = self.tables.read().unwrap();
        Ok(tables.enrollments.iter().find(|e| e.id == id).cloned())
    }

    async fn delete_enrollment(&self, id: i32) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().unwrap();
        let before = tables.enrollments.len();
        tables.enrollments.retain(|e| e.id != id);
        Ok(tables.enrollments.len() != before)
    }
}
