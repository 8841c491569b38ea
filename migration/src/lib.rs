pub use sea_orm_migration::prelude::*;

mod m20250310_000001_create_table_users;
mod m20250310_000002_create_table_careers;
mod m20250310_000003_create_table_subjects_and_requirements;
mod m20250310_000004_create_table_students;
mod m20250310_000005_create_table_student_subjects_and_enrollments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_table_users::Migration),
            Box::new(m20250310_000002_create_table_careers::Migration),
            Box::new(m20250310_000003_create_table_subjects_and_requirements::Migration),
            Box::new(m20250310_000004_create_table_students::Migration),
            Box::new(m20250310_000005_create_table_student_subjects_and_enrollments::Migration),
        ]
    }
}
