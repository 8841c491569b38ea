use crate::entities::{enrollment, requirement, student_subject, subject};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

pub struct SubjectRepository {
    db: DatabaseConnection,
}

impl SubjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_all(&self, career_id: Option<i32>) -> Result<Vec<subject::Model>> {
        let db = self.get_connection();
        let mut query = subject::Entity::find();
        if let Some(career_id) = career_id {
            query = query.filter(subject::Column::CareerId.eq(career_id));
        }
        let subjects = query
            .order_by_asc(subject::Column::CareerId)
            .order_by_asc(subject::Column::Year)
            .order_by_asc(subject::Column::Code)
            .all(db)
            .await?;
        Ok(subjects)
    }

    pub async fn find_by_career(&self, career_id: i32) -> Result<Vec<subject::Model>> {
        self.find_all(Some(career_id)).await
    }

    pub async fn find_by_id(&self, subject_id: i32) -> Result<Option<subject::Model>> {
        let db = self.get_connection();
        let subject = subject::Entity::find_by_id(subject_id).one(db).await?;
        Ok(subject)
    }

    pub async fn find_by_ids(&self, subject_ids: Vec<i32>) -> Result<Vec<subject::Model>> {
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = self.get_connection();
        let subjects = subject::Entity::find()
            .filter(subject::Column::Id.is_in(subject_ids))
            .all(db)
            .await?;
        Ok(subjects)
    }

    pub async fn create(
        &self,
        career_id: i32,
        code: String,
        name: String,
        year: i32,
        hours: i32,
    ) -> Result<subject::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();
        let subject_model = subject::ActiveModel {
            career_id: Set(career_id),
            code: Set(code),
            name: Set(name),
            year: Set(year),
            hours: Set(hours),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = subject_model.insert(db).await?;
        Ok(result)
    }

    pub async fn update(&self, subject_id: i32, updates: SubjectUpdate) -> Result<subject::Model> {
        let subject = self
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Subject not found"))?;
        let db = self.get_connection();

        let mut active_model: subject::ActiveModel = subject.into();

        if let Some(career_id) = updates.career_id {
            active_model.career_id = Set(career_id);
        }
        if let Some(code) = updates.code {
            active_model.code = Set(code);
        }
        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(year) = updates.year {
            active_model.year = Set(year);
        }
        if let Some(hours) = updates.hours {
            active_model.hours = Set(hours);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(db).await?;
        Ok(result)
    }

    /// Deletes the subject, its requirements in both directions and every
    /// record and enrollment that references it.
    pub async fn delete(&self, subject_id: i32) -> Result<bool> {
        let txn = self.get_connection().begin().await?;
        let deleted = delete_subject_rows(&txn, subject_id).await?;
        txn.commit().await?;
        Ok(deleted)
    }
}

pub(crate) async fn delete_subject_rows<C>(conn: &C, subject_id: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    requirement::Entity::delete_many()
        .filter(
            Condition::any()
                .add(requirement::Column::SubjectId.eq(subject_id))
                .add(requirement::Column::RequiredSubjectId.eq(subject_id)),
        )
        .exec(conn)
        .await?;

    student_subject::Entity::delete_many()
        .filter(student_subject::Column::SubjectId.eq(subject_id))
        .exec(conn)
        .await?;

    enrollment::Entity::delete_many()
        .filter(enrollment::Column::SubjectId.eq(subject_id))
        .exec(conn)
        .await?;

    let result = subject::Entity::delete_by_id(subject_id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

pub struct SubjectUpdate {
    pub career_id: Option<i32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub hours: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement, Transaction, Value};

    fn deleted(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn logged(log: &[Transaction]) -> Vec<Statement> {
        log.iter()
            .flat_map(|txn| txn.statements().iter().cloned())
            .collect()
    }

    fn bound_values(stmt: &Statement) -> Vec<Value> {
        stmt.values
            .as_ref()
            .map(|values| values.0.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_delete_removes_dependents_in_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([deleted(2), deleted(3), deleted(1), deleted(1)])
            .into_connection();
        let repository = SubjectRepository::new(db.clone());

        assert!(repository.delete(7).await.unwrap());

        let stmts = logged(&db.into_transaction_log());
        let sql: Vec<&str> = stmts.iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(sql.len(), 6);
        assert_eq!(sql[0], "BEGIN");

        // Requirements go in both directions.
        assert!(sql[1].starts_with(r#"DELETE FROM "requirements""#));
        assert!(sql[1].contains(r#""subject_id" = $1"#));
        assert!(sql[1].contains(" OR "));
        assert!(sql[1].contains(r#""required_subject_id" = $2"#));
        assert_eq!(bound_values(&stmts[1]), vec![Value::Int(Some(7)), Value::Int(Some(7))]);

        assert!(sql[2].starts_with(r#"DELETE FROM "student_subjects""#));
        assert!(sql[3].starts_with(r#"DELETE FROM "enrollments""#));
        assert!(sql[4].starts_with(r#"DELETE FROM "subjects""#));
        for stmt in &stmts[2..5] {
            assert_eq!(bound_values(stmt), vec![Value::Int(Some(7))]);
        }
        assert_eq!(sql[5], "COMMIT");
    }

    #[tokio::test]
    async fn test_delete_missing_subject_reports_false() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([deleted(0), deleted(0), deleted(0), deleted(0)])
            .into_connection();

        assert!(!SubjectRepository::new(db).delete(404).await.unwrap());
    }
}
