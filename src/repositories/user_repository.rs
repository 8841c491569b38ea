use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::{student, user};
use crate::repositories::student_repository::delete_student_rows;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_all(&self, role_filter: Option<RoleEnum>) -> Result<Vec<user::Model>> {
        let db = self.get_connection();
        let mut query = user::Entity::find();
        if let Some(role) = role_filter {
            query = query.filter(user::Column::Role.eq(role));
        }
        let users = query.order_by_asc(user::Column::Id).all(db).await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<user::Model>> {
        let db = self.get_connection();
        let user = user::Entity::find_by_id(user_id).one(db).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let db = self.get_connection();
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await?;
        Ok(user)
    }

    /// `password_hash` must already be hashed.
    pub async fn create(
        &self,
        email: String,
        password_hash: String,
        full_name: String,
        role: RoleEnum,
    ) -> Result<user::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            email: Set(email.trim().to_lowercase()),
            password: Set(password_hash),
            full_name: Set(full_name),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = user_model.insert(db).await?;
        Ok(result)
    }

    pub async fn update(&self, user_id: i32, updates: UserUpdate) -> Result<user::Model> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;
        let db = self.get_connection();

        let mut active_user: user::ActiveModel = user.into();

        if let Some(email) = updates.email {
            active_user.email = Set(email.trim().to_lowercase());
        }
        if let Some(password_hash) = updates.password_hash {
            active_user.password = Set(password_hash);
        }
        if let Some(full_name) = updates.full_name {
            active_user.full_name = Set(full_name);
        }
        if let Some(role) = updates.role {
            active_user.role = Set(role);
        }

        active_user.updated_at = Set(Utc::now().naive_utc());

        let result = active_user.update(db).await?;
        Ok(result)
    }

    /// Deletes the user together with its student record, if any.
    pub async fn delete(&self, user_id: i32) -> Result<bool> {
        let txn = self.get_connection().begin().await?;

        let students = student::Entity::find()
            .filter(student::Column::UserId.eq(user_id))
            .all(&txn)
            .await?;
        for student in students {
            delete_student_rows(&txn, student.id).await?;
        }

        let result = user::Entity::delete_by_id(user_id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}

pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<RoleEnum>,
}
