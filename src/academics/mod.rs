//! Enrollment rules for the academic record: prerequisite (correlatividad)
//! checks, the per-subject status lifecycle and the legajo summary.
//!
//! Every component here receives its [`EntityStore`] explicitly, so the same
//! rules run against PostgreSQL in production and against
//! an in-memory store in tests.

pub mod enrollment;
pub mod error;
pub mod evaluator;
pub mod record;
pub mod sea_orm_store;
pub mod store;

#[cfg(test)]
pub mod memory_store;

pub use enrollment::{
    EnrollmentOutcome, EnrollmentRequest, EnrollmentService, RecordEntry, StatusUpdate,
};
pub use error::EnrollmentError;
pub use evaluator::{Eligibility, PrerequisiteEvaluator};
pub use record::AcademicRecord;
pub use sea_orm_store::SeaOrmStore;
pub use store::{EntityStore, NewEnrollment, NewStudentSubject, StoreError, StudentSubjectPatch};
