pub mod career_repository;
pub mod enrollment_repository;
pub mod requirement_repository;
pub mod student_repository;
pub mod student_subject_repository;
pub mod subject_repository;
pub mod user_repository;

pub use career_repository::{CareerRepository, CareerUpdate};
pub use enrollment_repository::EnrollmentRepository;
pub use requirement_repository::RequirementRepository;
pub use student_repository::{StudentFilter, StudentRepository, StudentUpdate};
pub use student_subject_repository::StudentSubjectRepository;
pub use subject_repository::{SubjectRepository, SubjectUpdate};
pub use user_repository::{UserRepository, UserUpdate};
