use crate::academics::{NewStudentSubject, StudentSubjectPatch};
use crate::entities::sea_orm_active_enums::StudentSubjectStatus;
use crate::entities::{student_subject, subject};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

pub struct StudentSubjectRepository {
    db: DatabaseConnection,
}

impl StudentSubjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn get_connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<student_subject::Model>> {
        let db = self.get_connection();
        let record = student_subject::Entity::find_by_id(id).one(db).await?;
        Ok(record)
    }

    pub async fn find_by_student(&self, student_id: i32) -> Result<Vec<student_subject::Model>> {
        let db = self.get_connection();
        let records = student_subject::Entity::find()
            .filter(student_subject::Column::StudentId.eq(student_id))
            .order_by_asc(student_subject::Column::Id)
            .all(db)
            .await?;
        Ok(records)
    }

    pub async fn find_by_student_with_subject(
        &self,
        student_id: i32,
    ) -> Result<Vec<(student_subject::Model, Option<subject::Model>)>> {
        let db = self.get_connection();
        let rows = student_subject::Entity::find()
            .filter(student_subject::Column::StudentId.eq(student_id))
            .find_also_related(subject::Entity)
            .order_by_asc(student_subject::Column::Id)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Most recently modified records first, for the activity feed.
    pub async fn find_recent(
        &self,
        limit: u64,
    ) -> Result<Vec<(student_subject::Model, Option<subject::Model>)>> {
        let db = self.get_connection();
        let rows = student_subject::Entity::find()
            .find_also_related(subject::Entity)
            .order_by_desc(student_subject::Column::UpdatedAt)
            .order_by_desc(student_subject::Column::Id)
            .limit(limit)
            .all(db)
            .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: NewStudentSubject) -> Result<student_subject::Model> {
        insert_student_subject(self.get_connection(), data).await
    }

    /// Returns `None` when the row does not exist.
    pub async fn update(
        &self,
        id: i32,
        patch: StudentSubjectPatch,
    ) -> Result<Option<student_subject::Model>> {
        let Some(record) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let db = self.get_connection();

        let mut active_model: student_subject::ActiveModel = record.into();

        if let Some(status) = patch.status {
            active_model.status = Set(status);
        }
        if let Some(grade) = patch.grade {
            active_model.grade = Set(grade);
        }
        if let Some(date) = patch.date {
            active_model.date = Set(date);
        }
        if let Some(book) = patch.book {
            active_model.book = Set(book);
        }
        if let Some(folio) = patch.folio {
            active_model.folio = Set(folio);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(db).await?;
        Ok(Some(result))
    }

    pub async fn count_by_status(&self, status: StudentSubjectStatus) -> Result<u64> {
        let db = self.get_connection();
        let count = student_subject::Entity::find()
            .filter(student_subject::Column::Status.eq(status))
            .count(db)
            .await?;
        Ok(count)
    }
}

pub(crate) async fn insert_student_subject<C>(
    conn: &C,
    data: NewStudentSubject,
) -> Result<student_subject::Model>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();
    let record = student_subject::ActiveModel {
        student_id: Set(data.student_id),
        subject_id: Set(data.subject_id),
        status: Set(data.status),
        grade: Set(data.grade),
        date: Set(data.date),
        book: Set(data.book),
        folio: Set(data.folio),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = record.insert(conn).await?;
    Ok(result)
}
