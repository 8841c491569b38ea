pub mod career;
pub mod enrollment;
pub mod requirement;
pub mod sea_orm_active_enums;
pub mod student;
pub mod student_subject;
pub mod subject;
pub mod user;
