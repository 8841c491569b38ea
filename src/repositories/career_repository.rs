use crate::entities::{career, student, subject};
use crate::repositories::subject_repository::delete_subject_rows;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

pub struct CareerRepository {
    db: DatabaseConnection,
}

impl CareerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_all(&self) -> Result<Vec<career::Model>> {
        let db = self.get_connection();
        let careers = career::Entity::find()
            .order_by_asc(career::Column::Name)
            .all(db)
            .await?;
        Ok(careers)
    }

    pub async fn find_by_id(&self, career_id: i32) -> Result<Option<career::Model>> {
        let db = self.get_connection();
        let career = career::Entity::find_by_id(career_id).one(db).await?;
        Ok(career)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<career::Model>> {
        let db = self.get_connection();
        let career = career::Entity::find()
            .filter(career::Column::Code.eq(code))
            .one(db)
            .await?;
        Ok(career)
    }

    pub async fn create(
        &self,
        name: String,
        code: String,
        description: Option<String>,
        duration_years: i32,
    ) -> Result<career::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();
        let career_model = career::ActiveModel {
            name: Set(name),
            code: Set(code),
            description: Set(description),
            duration_years: Set(duration_years),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = career_model.insert(db).await?;
        Ok(result)
    }

    pub async fn update(&self, career_id: i32, updates: CareerUpdate) -> Result<career::Model> {
        let career = self
            .find_by_id(career_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Career not found"))?;
        let db = self.get_connection();

        let mut active_model: career::ActiveModel = career.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(code) = updates.code {
            active_model.code = Set(code);
        }
        if let Some(description) = updates.description {
            active_model.description = Set(Some(description));
        }
        if let Some(duration_years) = updates.duration_years {
            active_model.duration_years = Set(duration_years);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(db).await?;
        Ok(result)
    }

    pub async fn count_students(&self, career_id: i32) -> Result<u64> {
        let db = self.get_connection();
        let count = student::Entity::find()
            .filter(student::Column::CareerId.eq(career_id))
            .count(db)
            .await?;
        Ok(count)
    }

    /// Deletes the career and its plan of study. Callers must check
    /// [`Self::count_students`] first; the students foreign key rejects the
    /// delete otherwise.
    pub async fn delete(&self, career_id: i32) -> Result<bool> {
        let txn = self.get_connection().begin().await?;

        let subjects = subject::Entity::find()
            .filter(subject::Column::CareerId.eq(career_id))
            .all(&txn)
            .await?;
        for subject in subjects {
            delete_subject_rows(&txn, subject.id).await?;
        }

        let result = career::Entity::delete_by_id(career_id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}

pub struct CareerUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub duration_years: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn subject_row(id: i32, code: &str) -> subject::Model {
        let now = Utc::now().naive_utc();
        subject::Model {
            id,
            career_id: 3,
            code: code.to_string(),
            name: code.to_string(),
            year: 1,
            hours: 96,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_delete_takes_the_plan_of_study_with_it() {
        let deleted = MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![subject_row(11, "MAT101"), subject_row(12, "MAT201")]])
            .append_exec_results(std::iter::repeat_n(deleted, 9))
            .into_connection();
        let repository = CareerRepository::new(db.clone());

        assert!(repository.delete(3).await.unwrap());

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql: Vec<String> = log[0]
            .statements()
            .iter()
            .map(|stmt| stmt.sql.clone())
            .collect();
        assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
        assert!(sql[1].starts_with(r#"SELECT"#));
        assert!(sql[1].contains(r#"FROM "subjects""#));

        let deletes: Vec<&String> = sql.iter().filter(|s| s.starts_with("DELETE")).collect();
        assert_eq!(deletes.len(), 9);
        let subject_deletes = deletes
            .iter()
            .filter(|s| s.starts_with(r#"DELETE FROM "subjects""#))
            .count();
        assert_eq!(subject_deletes, 2);
        assert!(deletes[8].starts_with(r#"DELETE FROM "careers""#));
        assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
    }
}
