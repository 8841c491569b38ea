use crate::entities::sea_orm_active_enums::StudentStatus;
use crate::entities::{enrollment, student, student_subject};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

pub struct StudentRepository {
    db: DatabaseConnection,
}

#[derive(Debug, Default)]
pub struct StudentFilter {
    pub career_id: Option<i32>,
    pub status: Option<StudentStatus>,
    /// Matches file numbers containing the term.
    pub search: Option<String>,
}

impl StudentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_all_with_pagination(
        &self,
        page: u32,
        page_size: u32,
        filter: StudentFilter,
    ) -> Result<(Vec<student::Model>, u64)> {
        let db = self.get_connection();
        let mut query = student::Entity::find();

        if let Some(career_id) = filter.career_id {
            query = query.filter(student::Column::CareerId.eq(career_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(student::Column::Status.eq(status));
        }
        if let Some(search_term) = filter.search {
            query = query.filter(student::Column::FileNumber.contains(search_term.trim()));
        }

        let paginator = query
            .order_by_asc(student::Column::FileNumber)
            .paginate(db, page_size.max(1) as u64);
        let total = paginator.num_items().await?;
        let students = paginator
            .fetch_page(page.saturating_sub(1) as u64)
            .await?;

        Ok((students, total))
    }

    pub async fn find_by_id(&self, student_id: i32) -> Result<Option<student::Model>> {
        let db = self.get_connection();
        let student = student::Entity::find_by_id(student_id).one(db).await?;
        Ok(student)
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<student::Model>> {
        let db = self.get_connection();
        let student = student::Entity::find()
            .filter(student::Column::UserId.eq(user_id))
            .one(db)
            .await?;
        Ok(student)
    }

    pub async fn find_by_file_number(&self, file_number: &str) -> Result<Option<student::Model>> {
        let db = self.get_connection();
        let student = student::Entity::find()
            .filter(student::Column::FileNumber.eq(file_number))
            .one(db)
            .await?;
        Ok(student)
    }

    pub async fn create(
        &self,
        user_id: i32,
        career_id: i32,
        file_number: String,
        enrollment_date: NaiveDate,
        status: StudentStatus,
    ) -> Result<student::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();
        let student_model = student::ActiveModel {
            user_id: Set(user_id),
            career_id: Set(career_id),
            file_number: Set(file_number),
            enrollment_date: Set(enrollment_date),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = student_model.insert(db).await?;
        Ok(result)
    }

    pub async fn update(&self, student_id: i32, updates: StudentUpdate) -> Result<student::Model> {
        let student = self
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Student not found"))?;
        let db = self.get_connection();

        let mut active_model: student::ActiveModel = student.into();

        if let Some(career_id) = updates.career_id {
            active_model.career_id = Set(career_id);
        }
        if let Some(file_number) = updates.file_number {
            active_model.file_number = Set(file_number);
        }
        if let Some(enrollment_date) = updates.enrollment_date {
            active_model.enrollment_date = Set(enrollment_date);
        }
        if let Some(status) = updates.status {
            active_model.status = Set(status);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(db).await?;
        Ok(result)
    }

    /// Deletes the student with its records and enrollments. The owning user
    /// is kept.
    pub async fn delete(&self, student_id: i32) -> Result<bool> {
        let txn = self.get_connection().begin().await?;
        let deleted = delete_student_rows(&txn, student_id).await?;
        txn.commit().await?;
        Ok(deleted)
    }

    pub async fn count_by_status(&self, status: StudentStatus) -> Result<u64> {
        let db = self.get_connection();
        let count = student::Entity::find()
            .filter(student::Column::Status.eq(status))
            .count(db)
            .await?;
        Ok(count)
    }
}

pub(crate) async fn delete_student_rows<C>(conn: &C, student_id: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    student_subject::Entity::delete_many()
        .filter(student_subject::Column::StudentId.eq(student_id))
        .exec(conn)
        .await?;

    enrollment::Entity::delete_many()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .exec(conn)
        .await?;

    let result = student::Entity::delete_by_id(student_id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

pub struct StudentUpdate {
    pub career_id: Option<i32>,
    pub file_number: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub status: Option<StudentStatus>,
}
