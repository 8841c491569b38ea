use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::store::{EntityStore, NewEnrollment, NewStudentSubject, StoreError, StudentSubjectPatch};
use crate::entities::{enrollment, requirement, student, student_subject, subject};
use crate::repositories::{
    EnrollmentRepository, RequirementRepository, StudentRepository, StudentSubjectRepository,
    SubjectRepository,
};

/// [`EntityStore`] backed by the PostgreSQL repositories.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn subjects(&self) -> SubjectRepository {
        SubjectRepository::new(self.db.clone())
    }

    fn student_subjects(&self) -> StudentSubjectRepository {
        StudentSubjectRepository::new(self.db.clone())
    }

    fn enrollments(&self) -> EnrollmentRepository {
        EnrollmentRepository::new(self.db.clone())
    }
}

#[async_trait]
impl EntityStore for SeaOrmStore {
    async fn get_subject(&self, id: i32) -> Result<Option<subject::Model>, StoreError> {
        Ok(self.subjects().find_by_id(id).await?)
    }

    async fn get_subjects_by_career(
        &self,
        career_id: i32,
    ) -> Result<Vec<subject::Model>, StoreError> {
        Ok(self.subjects().find_by_career(career_id).await?)
    }

    async fn get_student(&self, id: i32) -> Result<Option<student::Model>, StoreError> {
        Ok(StudentRepository::new(self.db.clone()).find_by_id(id).await?)
    }

    async fn get_requirements(
        &self,
        subject_id: i32,
    ) -> Result<Vec<requirement::Model>, StoreError> {
        Ok(RequirementRepository::new(self.db.clone())
            .find_by_subject(subject_id)
            .await?)
    }

    async fn get_student_subjects(
        &self,
        student_id: i32,
    ) -> Result<Vec<student_subject::Model>, StoreError> {
        Ok(self.student_subjects().find_by_student(student_id).await?)
    }

    async fn get_student_subject(
        &self,
        id: i32,
    ) -> Result<Option<student_subject::Model>, StoreError> {
        Ok(self.student_subjects().find_by_id(id).await?)
    }

    async fn create_enrollment(
        &self,
        data: NewEnrollment,
    ) -> Result<enrollment::Model, StoreError> {
        Ok(self.enrollments().create(data).await?)
    }

    async fn create_cursada(
        &self,
        enrollment: NewEnrollment,
        student_subject: NewStudentSubject,
    ) -> Result<(enrollment::Model, student_subject::Model), StoreError> {
        Ok(self
            .enrollments()
            .create_with_student_subject(enrollment, student_subject)
            .await?)
    }

    async fn add_student_subject(
        &self,
        data: NewStudentSubject,
    ) -> Result<student_subject::Model, StoreError> {
        Ok(self.student_subjects().create(data).await?)
    }

    async fn update_student_subject(
        &self,
        id: i32,
        patch: StudentSubjectPatch,
    ) -> Result<Option<student_subject::Model>, StoreError> {
        Ok(self.student_subjects().update(id, patch).await?)
    }

    async fn get_enrollment(&self, id: i32) -> Result<Option<enrollment::Model>, StoreError> {
        Ok(self.enrollments().find_by_id(id).await?)
    }

    async fn delete_enrollment(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.enrollments().delete(id).await?)
    }
}
