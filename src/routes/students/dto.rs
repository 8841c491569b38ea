use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::academics::Eligibility;
use crate::entities::sea_orm_active_enums::StudentStatus;
use crate::entities::student;
use crate::routes::subjects::dto::SubjectResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    /// User account with the student role
    #[schema(example = 12)]
    pub user_id: i32,

    #[schema(example = 1)]
    pub career_id: i32,

    #[schema(example = "L-2025-0042")]
    pub file_number: String,

    /// Defaults to today
    pub enrollment_date: Option<NaiveDate>,

    pub status: Option<StudentStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub career_id: Option<i32>,
    pub file_number: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentQueryParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub career_id: Option<i32>,
    pub status: Option<StudentStatus>,
    /// Matches part of the file number
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub user_id: i32,
    pub career_id: i32,
    pub file_number: String,
    pub enrollment_date: NaiveDate,
    pub status: StudentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<student::Model> for StudentResponse {
    fn from(student: student::Model) -> Self {
        Self {
            id: student.id,
            user_id: student.user_id,
            career_id: student.career_id,
            file_number: student.file_number,
            enrollment_date: student.enrollment_date,
            status: student.status,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub students: Vec<StudentResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EligibilityResponse {
    pub student_id: i32,
    pub subject_id: i32,
    pub eligible: bool,
    pub missing: Vec<SubjectResponse>,
    /// One line per missing subject
    pub messages: Vec<String>,
}

impl EligibilityResponse {
    pub fn new(student_id: i32, subject_id: i32, eligibility: Eligibility) -> Self {
        let messages = eligibility.messages();
        Self {
            student_id,
            subject_id,
            eligible: eligibility.eligible,
            missing: eligibility
                .missing
                .into_iter()
                .map(SubjectResponse::from)
                .collect(),
            messages,
        }
    }
}
