use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::CareerId).integer().not_null())
                    .col(ColumnDef::new(Subjects::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Year).integer().not_null())
                    .col(ColumnDef::new(Subjects::Hours).integer().not_null())
                    .col(
                        ColumnDef::new(Subjects::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Subjects::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subjects_career")
                            .from_tbl(Subjects::Table)
                            .from_col(Subjects::CareerId)
                            .to_tbl(Careers::Table)
                            .to_col(Careers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subjects_career_id")
                    .table(Subjects::Table)
                    .col(Subjects::CareerId)
                    .to_owned(),
            )
            .await?;

        // Both ends cascade: removing a subject drops the edges into and out of it.
        manager
            .create_table(
                Table::create()
                    .table(Requirements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requirements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requirements::SubjectId).integer().not_null())
                    .col(
                        ColumnDef::new(Requirements::RequiredSubjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Requirements::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requirements_subject")
                            .from_tbl(Requirements::Table)
                            .from_col(Requirements::SubjectId)
                            .to_tbl(Subjects::Table)
                            .to_col(Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requirements_required_subject")
                            .from_tbl(Requirements::Table)
                            .from_col(Requirements::RequiredSubjectId)
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
                    .name("idx_requirements_pair")
                    .table(Requirements::Table)
                    .col(Requirements::SubjectId)
                    .col(Requirements::RequiredSubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Requirements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    CareerId,
    Code,
    Name,
    Year,
    Hours,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Requirements {
    Table,
    Id,
    SubjectId,
    RequiredSubjectId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Careers {
    Table,
    Id,
}
