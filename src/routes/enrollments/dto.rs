use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::academics::EnrollmentOutcome;
use crate::entities::sea_orm_active_enums::EnrollmentType;
use crate::entities::{enrollment, subject};
use crate::routes::student_subjects::dto::StudentSubjectResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollRequest {
    /// Required for staff; students always enroll themselves
    pub student_id: Option<i32>,

    #[schema(example = 3)]
    pub subject_id: i32,

    #[schema(example = "cursada")]
    pub enrollment_type: EnrollmentType,

    /// Required for `examen`
    pub exam_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EnrollmentQueryParams {
    pub student_id: Option<i32>,
    pub subject_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: i32,
    pub student_id: i32,
    pub subject_id: i32,
    pub subject_code: Option<String>,
    pub subject_name: Option<String>,
    pub enrollment_type: EnrollmentType,
    pub exam_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl EnrollmentResponse {
    pub fn new(enrollment: enrollment::Model, subject: Option<&subject::Model>) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            subject_id: enrollment.subject_id,
            subject_code: subject.map(|s| s.code.clone()),
            subject_name: subject.map(|s| s.name.clone()),
            enrollment_type: enrollment.enrollment_type,
            exam_date: enrollment.exam_date,
            created_at: enrollment.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollResponse {
    pub enrollment: EnrollmentResponse,
    /// The `cursando` row opened by a cursada
    pub student_subject: Option<StudentSubjectResponse>,
}

impl From<EnrollmentOutcome> for EnrollResponse {
    fn from(outcome: EnrollmentOutcome) -> Self {
        Self {
            enrollment: EnrollmentResponse::new(outcome.enrollment, Some(&outcome.subject)),
            student_subject: outcome.student_subject.map(StudentSubjectResponse::from),
        }
    }
}
