use crate::academics::{NewEnrollment, NewStudentSubject};
use crate::entities::{enrollment, student_subject, subject};
use crate::repositories::student_subject_repository::insert_student_subject;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

pub struct EnrollmentRepository {
    db: DatabaseConnection,
}

impl EnrollmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_all(
        &self,
        student_id: Option<i32>,
        subject_id: Option<i32>,
    ) -> Result<Vec<(enrollment::Model, Option<subject::Model>)>> {
        let db = self.get_connection();
        let mut query = enrollment::Entity::find();
        if let Some(student_id) = student_id {
            query = query.filter(enrollment::Column::StudentId.eq(student_id));
        }
        if let Some(subject_id) = subject_id {
            query = query.filter(enrollment::Column::SubjectId.eq(subject_id));
        }
        let rows = query
            .find_also_related(subject::Entity)
            .order_by_desc(enrollment::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, enrollment_id: i32) -> Result<Option<enrollment::Model>> {
        let db = self.get_connection();
        let enrollment = enrollment::Entity::find_by_id(enrollment_id).one(db).await?;
        Ok(enrollment)
    }

    pub async fn create(&self, data: NewEnrollment) -> Result<enrollment::Model> {
        insert_enrollment(self.get_connection(), data).await
    }

    /// Inserts both rows of a cursada in a single transaction.
    pub async fn create_with_student_subject(
        &self,
        data: NewEnrollment,
        record: NewStudentSubject,
    ) -> Result<(enrollment::Model, student_subject::Model)> {
        let txn = self.get_connection().begin().await?;
        let enrollment = insert_enrollment(&txn, data).await?;
        let student_subject = insert_student_subject(&txn, record).await?;
        txn.commit().await?;
        Ok((enrollment, student_subject))
    }

    pub async fn delete(&self, enrollment_id: i32) -> Result<bool> {
        let db = self.get_connection();
        let result = enrollment::Entity::delete_by_id(enrollment_id)
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let db = self.get_connection();
        let count = enrollment::Entity::find().count(db).await?;
        Ok(count)
    }
}

async fn insert_enrollment<C>(conn: &C, data: NewEnrollment) -> Result<enrollment::Model>
where
    C: ConnectionTrait,
{
    let enrollment_model = enrollment::ActiveModel {
        student_id: Set(data.student_id),
        subject_id: Set(data.subject_id),
        enrollment_type: Set(data.enrollment_type),
        exam_date: Set(data.exam_date),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    let result = enrollment_model.insert(conn).await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{EnrollmentType, StudentSubjectStatus};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    fn logged_sql(log: &[Transaction]) -> Vec<String> {
        log.iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect()
    }

    fn enrollment_row() -> enrollment::Model {
        enrollment::Model {
            id: 1,
            student_id: 10,
            subject_id: 20,
            enrollment_type: EnrollmentType::Cursada,
            exam_date: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn cursando_row() -> student_subject::Model {
        let now = Utc::now().naive_utc();
        student_subject::Model {
            id: 5,
            student_id: 10,
            subject_id: 20,
            status: StudentSubjectStatus::Cursando,
            grade: None,
            date: None,
            book: None,
            folio: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn cursada() -> NewEnrollment {
        NewEnrollment {
            student_id: 10,
            subject_id: 20,
            enrollment_type: EnrollmentType::Cursada,
            exam_date: None,
        }
    }

    #[tokio::test]
    async fn test_cursada_rows_share_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![enrollment_row()]])
            .append_query_results([vec![cursando_row()]])
            .into_connection();
        let repository = EnrollmentRepository::new(db.clone());

        let (enrollment, record) = repository
            .create_with_student_subject(cursada(), NewStudentSubject::cursando(10, 20))
            .await
            .unwrap();
        assert_eq!(enrollment.id, 1);
        assert_eq!(record.status, StudentSubjectStatus::Cursando);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = logged_sql(&log);
        assert_eq!(sql.len(), 4);
        assert_eq!(sql[0], "BEGIN");
        assert!(sql[1].starts_with(r#"INSERT INTO "enrollments""#));
        assert!(sql[2].starts_with(r#"INSERT INTO "student_subjects""#));
        assert_eq!(sql[3], "COMMIT");
    }

    #[tokio::test]
    async fn test_failed_record_insert_rolls_back_enrollment() {
        // No result queued for the second insert, so it fails.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![enrollment_row()]])
            .into_connection();
        let repository = EnrollmentRepository::new(db.clone());

        let result = repository
            .create_with_student_subject(cursada(), NewStudentSubject::cursando(10, 20))
            .await;
        assert!(result.is_err());

        let sql = logged_sql(&db.into_transaction_log());
        assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
        assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
        assert!(!sql.iter().any(|s| s == "COMMIT"));
    }
}
