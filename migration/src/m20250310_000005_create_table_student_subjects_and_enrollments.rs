use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No unique (student_id, subject_id) index: a student who ended "libre"
        // may take the subject again, which adds a new row.
        manager
            .create_table(
                Table::create()
                    .table(StudentSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentSubjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentSubjects::StudentId).integer().not_null())
                    .col(ColumnDef::new(StudentSubjects::SubjectId).integer().not_null())
                    .col(
                        ColumnDef::new(StudentSubjects::Status)
                            .string_len(16)
                            .not_null()
                            .default("cursando"),
                    )
                    .col(ColumnDef::new(StudentSubjects::Grade).integer().null())
                    .col(ColumnDef::new(StudentSubjects::Date).date().null())
                    .col(ColumnDef::new(StudentSubjects::Book).string_len(32).null())
                    .col(ColumnDef::new(StudentSubjects::Folio).string_len(32).null())
                    .col(
                        ColumnDef::new(StudentSubjects::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(StudentSubjects::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .check(
                        Expr::col(StudentSubjects::Grade)
                            .is_null()
                            .or(Expr::col(StudentSubjects::Grade).between(4, 10)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_subjects_student")
                            .from_tbl(StudentSubjects::Table)
                            .from_col(StudentSubjects::StudentId)
                            .to_tbl(Students::Table)
                            .to_col(Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_subjects_subject")
                            .from_tbl(StudentSubjects::Table)
                            .from_col(StudentSubjects::SubjectId)
                            .to_tbl(Subjects::Table)
                            .to_col(Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_subjects_student_id")
                    .table(StudentSubjects::Table)
                    .col(StudentSubjects::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_subjects_updated_at")
                    .table(StudentSubjects::Table)
                    .col(StudentSubjects::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::SubjectId).integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrollmentType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::ExamDate).date().null())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from_tbl(Enrollments::Table)
                            .from_col(Enrollments::StudentId)
                            .to_tbl(Students::Table)
                            .to_col(Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_subject")
                            .from_tbl(Enrollments::Table)
                            .from_col(Enrollments::SubjectId)
                            .to_tbl(Subjects::Table)
                            .to_col(Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentSubjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StudentSubjects {
    Table,
    Id,
    StudentId,
    SubjectId,
    Status,
    Grade,
    Date,
    Book,
    Folio,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    SubjectId,
    EnrollmentType,
    ExamDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
}
