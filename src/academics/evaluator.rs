use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, Months, NaiveDate};

use super::store::{EntityStore, StoreError};
use crate::entities::sea_orm_active_enums::StudentSubjectStatus;
use crate::entities::{student_subject, subject};

/// How long a `regular` standing keeps satisfying prerequisites, counted from
/// the regularization date.
pub const REGULAR_VALIDITY_MONTHS: u32 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct Eligibility {
    pub eligible: bool,
    pub missing: Vec<subject::Model>,
}

impl Eligibility {
    fn from_missing(missing: Vec<subject::Model>) -> Self {
        Self {
            eligible: missing.is_empty(),
            missing,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.missing.iter().map(missing_subject_message).collect()
    }
}

pub fn missing_subject_message(subject: &subject::Model) -> String {
    format!("Falta regularizar materia {} - {}", subject.code, subject.name)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Last day on which a regularization dated `date` is still valid.
pub fn regular_valid_until(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(REGULAR_VALIDITY_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Whether a record counts as having passed the subject for prerequisite
/// purposes. New `regular` rows always carry a date; rows loaded without
/// one are treated as not expiring.
pub fn satisfies_requirement(record: &student_subject::Model, today: NaiveDate) -> bool {
    match record.status {
        StudentSubjectStatus::Acreditada => true,
        StudentSubjectStatus::Regular => record
            .date
            .is_none_or(|date| today <= regular_valid_until(date)),
        StudentSubjectStatus::Cursando | StudentSubjectStatus::Libre => false,
    }
}

/// Whether a record still represents the student's standing in the subject.
/// Only `libre` and expired `regular` rows leave room for a new cursada.
pub fn is_current(record: &student_subject::Model, today: NaiveDate) -> bool {
    match record.status {
        StudentSubjectStatus::Cursando | StudentSubjectStatus::Acreditada => true,
        StudentSubjectStatus::Regular => satisfies_requirement(record, today),
        StudentSubjectStatus::Libre => false,
    }
}

/// Single-hop prerequisite check. Requirements of requirements are not
/// followed.
pub struct PrerequisiteEvaluator {
    store: Arc<dyn EntityStore>,
}

impl PrerequisiteEvaluator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn is_eligible(
        &self,
        student_id: i32,
        subject_id: i32,
    ) -> Result<Eligibility, StoreError> {
        self.is_eligible_on(student_id, subject_id, today()).await
    }

    pub async fn is_eligible_on(
        &self,
        student_id: i32,
        subject_id: i32,
        today: NaiveDate,
    ) -> Result<Eligibility, StoreError> {
        let records = self.store.get_student_subjects(student_id).await?;
        self.check_records(subject_id, &records, today).await
    }

    /// Evaluates `subject_id` against records the caller already loaded.
    pub async fn check_records(
        &self,
        subject_id: i32,
        records: &[student_subject::Model],
        today: NaiveDate,
    ) -> Result<Eligibility, StoreError> {
        let requirements = self.store.get_requirements(subject_id).await?;

        let satisfied: HashSet<i32> = records
            .iter()
            .filter(|record| satisfies_requirement(record, today))
            .map(|record| record.subject_id)
            .collect();

        let mut missing = Vec::new();
        let mut seen = HashSet::new();
        for requirement in requirements {
            let required_id = requirement.required_subject_id;
            if satisfied.contains(&required_id) || !seen.insert(required_id) {
                continue;
            }

            match self.store.get_subject(required_id).await? {
                Some(required) => missing.push(required),
                None => tracing::warn!(
                    subject_id,
                    required_subject_id = required_id,
                    "Requirement points to a missing subject, skipping"
                ),
            }
        }

        Ok(Eligibility::from_missing(missing))
    }
}
