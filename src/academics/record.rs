//! Legajo summary: a student's subjects with their standing and the derived
//! progress figures.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::sea_orm_active_enums::{StudentStatus, StudentSubjectStatus};
use crate::entities::{student, student_subject, subject};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordLine {
    pub student_subject_id: i32,
    pub subject_id: i32,
    pub code: String,
    pub name: String,
    pub year: i32,
    pub status: StudentSubjectStatus,
    pub grade: Option<i32>,
    pub date: Option<NaiveDate>,
    pub book: Option<String>,
    pub folio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub cursando: usize,
    pub regular: usize,
    pub acreditada: usize,
    pub libre: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AcademicRecord {
    pub student_id: i32,
    pub file_number: String,
    pub career_id: i32,
    pub student_status: StudentStatus,
    pub lines: Vec<RecordLine>,
    pub counts: StatusCounts,
    /// Mean grade over accredited subjects, two decimals.
    pub average_grade: Option<f64>,
    pub credited_hours: i32,
    pub total_hours: i32,
    /// Share of the career's hours already accredited, 0-100.
    pub progress_percent: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds the record from already loaded rows. `subjects` must resolve every
/// subject referenced by `records`; unresolved rows are skipped.
pub fn summarize(
    student: &student::Model,
    career_subjects: &[subject::Model],
    subjects: &HashMap<i32, subject::Model>,
    records: &[student_subject::Model],
) -> AcademicRecord {
    let mut lines: Vec<RecordLine> = records
        .iter()
        .filter_map(|record| {
            let subject = subjects.get(&record.subject_id)?;
            Some(RecordLine {
                student_subject_id: record.id,
                subject_id: subject.id,
                code: subject.code.clone(),
                name: subject.name.clone(),
                year: subject.year,
                status: record.status,
                grade: record.grade,
                date: record.date,
                book: record.book.clone(),
                folio: record.folio.clone(),
            })
        })
        .collect();
    lines.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.student_subject_id.cmp(&b.student_subject_id))
    });

    let mut counts = StatusCounts::default();
    for line in &lines {
        match line.status {
            StudentSubjectStatus::Cursando => counts.cursando += 1,
            StudentSubjectStatus::Regular => counts.regular += 1,
            StudentSubjectStatus::Acreditada => counts.acreditada += 1,
            StudentSubjectStatus::Libre => counts.libre += 1,
        }
    }

    let grades: Vec<i32> = lines
        .iter()
        .filter(|l| l.status == StudentSubjectStatus::Acreditada)
        .filter_map(|l| l.grade)
        .collect();
    let average_grade = if grades.is_empty() {
        None
    } else {
        Some(round2(
            grades.iter().map(|g| f64::from(*g)).sum::<f64>() / grades.len() as f64,
        ))
    };

    // A subject accredited twice only counts once.
    let accredited: HashSet<i32> = lines
        .iter()
        .filter(|l| l.status == StudentSubjectStatus::Acreditada)
        .map(|l| l.subject_id)
        .collect();
    let credited_hours: i32 = career_subjects
        .iter()
        .filter(|s| accredited.contains(&s.id))
        .map(|s| s.hours)
        .sum();
    let total_hours: i32 = career_subjects.iter().map(|s| s.hours).sum();
    let progress_percent = if total_hours > 0 {
        round2(f64::from(credited_hours) * 100.0 / f64::from(total_hours))
    } else {
        0.0
    };

    AcademicRecord {
        student_id: student.id,
        file_number: student.file_number.clone(),
        career_id: student.career_id,
        student_status: student.status,
        lines,
        counts,
        average_grade,
        credited_hours,
        total_hours,
        progress_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn subject(id: i32, code: &str, year: i32, hours: i32) -> subject::Model {
        let now = Utc::now().naive_utc();
        subject::Model {
            id,
            career_id: 1,
            code: code.to_string(),
            name: format!("Materia {code}"),
            year,
            hours,
            created_at: now,
            updated_at: now,
        }
    }

    fn record(
        id: i32,
        subject_id: i32,
        status: StudentSubjectStatus,
        grade: Option<i32>,
    ) -> student_subject::Model {
        let now = Utc::now().naive_utc();
        student_subject::Model {
            id,
            student_id: 1,
            subject_id,
            status,
            grade,
            date: None,
            book: None,
            folio: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn student() -> student::Model {
        let now = Utc::now().naive_utc();
        student::Model {
            id: 1,
            user_id: 10,
            career_id: 1,
            file_number: "L-1001".to_string(),
            enrollment_date: now.date(),
            status: StudentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summary_figures() {
        let career = vec![
            subject(1, "MAT101", 1, 100),
            subject(2, "FIS101", 1, 50),
            subject(3, "MAT201", 2, 50),
        ];
        let by_id: HashMap<_, _> = career.iter().map(|s| (s.id, s.clone())).collect();
        let records = vec![
            record(10, 3, StudentSubjectStatus::Cursando, None),
            record(11, 1, StudentSubjectStatus::Acreditada, Some(8)),
            record(12, 2, StudentSubjectStatus::Acreditada, Some(7)),
        ];

        let summary = summarize(&student(), &career, &by_id, &records);

        assert_eq!(summary.counts.acreditada, 2);
        assert_eq!(summary.counts.cursando, 1);
        assert_eq!(summary.average_grade, Some(7.5));
        assert_eq!(summary.credited_hours, 150);
        assert_eq!(summary.total_hours, 200);
        assert_eq!(summary.progress_percent, 75.0);
        let codes: Vec<_> = summary.lines.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["FIS101", "MAT101", "MAT201"]);
    }

    #[test]
    fn test_empty_record() {
        let career = vec![subject(1, "MAT101", 1, 100)];
        let by_id: HashMap<_, _> = career.iter().map(|s| (s.id, s.clone())).collect();

        let summary = summarize(&student(), &career, &by_id, &[]);

        assert!(summary.lines.is_empty());
        assert_eq!(summary.average_grade, None);
        assert_eq!(summary.progress_percent, 0.0);
        assert_eq!(summary.counts, StatusCounts::default());
    }

    #[test]
    fn test_repeated_accreditation_counts_hours_once() {
        let career = vec![subject(1, "MAT101", 1, 100), subject(2, "FIS101", 1, 100)];
        let by_id: HashMap<_, _> = career.iter().map(|s| (s.id, s.clone())).collect();
        let records = vec![
            record(10, 1, StudentSubjectStatus::Acreditada, Some(4)),
            record(11, 1, StudentSubjectStatus::Acreditada, Some(9)),
        ];

        let summary = summarize(&student(), &career, &by_id, &records);

        assert_eq!(summary.credited_hours, 100);
        assert_eq!(summary.progress_percent, 50.0);
        assert_eq!(summary.average_grade, Some(6.5));
    }
}
