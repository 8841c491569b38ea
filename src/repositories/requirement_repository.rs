use crate::entities::requirement;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct RequirementRepository {
    db: DatabaseConnection,
}

impl RequirementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Requirements the subject depends on.
    pub async fn find_by_subject(&self, subject_id: i32) -> Result<Vec<requirement::Model>> {
        let db = self.get_connection();
        let requirements = requirement::Entity::find()
            .filter(requirement::Column::SubjectId.eq(subject_id))
            .order_by_asc(requirement::Column::Id)
            .all(db)
            .await?;
        Ok(requirements)
    }

    pub async fn find_pair(
        &self,
        subject_id: i32,
        required_subject_id: i32,
    ) -> Result<Option<requirement::Model>> {
        let db = self.get_connection();
        let requirement = requirement::Entity::find()
            .filter(requirement::Column::SubjectId.eq(subject_id))
            .filter(requirement::Column::RequiredSubjectId.eq(required_subject_id))
            .one(db)
            .await?;
        Ok(requirement)
    }

    pub async fn create(
        &self,
        subject_id: i32,
        required_subject_id: i32,
    ) -> Result<requirement::Model> {
        let db = self.get_connection();
        let requirement_model = requirement::ActiveModel {
            subject_id: Set(subject_id),
            required_subject_id: Set(required_subject_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let result = requirement_model.insert(db).await?;
        Ok(result)
    }

    pub async fn delete(&self, requirement_id: i32) -> Result<bool> {
        let db = self.get_connection();
        let result = requirement::Entity::delete_by_id(requirement_id)
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
