//! Builds the report document from a fully loaded student profile.

use super::ReportError;
use super::document::{Column, ReportDocument, Section, SectionBody};
use super::format::{self, NOT_AVAILABLE, or_na};
use crate::domain::StudentReportSource;
use crate::domain::records::{Enrollment, Interaction, Payment, Student, StudentProfile};

pub const REPORT_TITLE: &str = "STUDENT REPORT";
pub const NO_ENROLLMENTS: &str = "No enrollments found.";
pub const NO_PAYMENTS: &str = "No payments found.";
pub const NO_INTERACTIONS: &str = "No interactions found.";

/// Load the student with its related rows and assemble the report.
pub async fn generate_report(
    source: &dyn StudentReportSource,
    student_id: i32,
) -> Result<ReportDocument, ReportError> {
    let profile = source
        .find_with_relations(student_id)
        .await
        .map_err(|e| ReportError::GenerationFailure(e.to_string()))?
        .ok_or(ReportError::NotFound)?;

    Ok(assemble(&profile))
}

pub fn assemble(profile: &StudentProfile) -> ReportDocument {
    let student = &profile.student;

    ReportDocument {
        student_code: student
            .student_id
            .clone()
            .unwrap_or_else(|| student.id.to_string()),
        sections: vec![
            Section {
                title: REPORT_TITLE.to_string(),
                body: SectionBody::Heading {
                    subtitle: student.full_name(),
                },
            },
            basic_information(student),
            enrollments(&profile.enrollments),
            payments(&profile.payments),
            interactions(&profile.interactions),
        ],
    }
}

fn basic_information(student: &Student) -> Section {
    let rows = [
        ("Student ID:", or_na(student.student_id.as_deref())),
        ("Email:", student.email.clone()),
        ("Phone:", or_na(student.phone.as_deref())),
        ("Status:", or_na(student.status)),
        ("Enrollment Date:", format::date(student.enrollment_date)),
        ("Graduation Date:", format::date(student.graduation_date)),
    ];

    Section {
        title: "Basic Information".to_string(),
        body: SectionBody::KeyValue {
            rows: rows
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        },
    }
}

fn table_or_notice(
    title: &str,
    notice: &str,
    columns: &[(&str, u8)],
    rows: Vec<Vec<String>>,
) -> Section {
    let body = if rows.is_empty() {
        SectionBody::Empty {
            notice: notice.to_string(),
        }
    } else {
        SectionBody::Table {
            columns: columns.iter().map(|(h, w)| Column::new(h, *w)).collect(),
            rows,
        }
    };

    Section {
        title: title.to_string(),
        body,
    }
}

fn enrollments(enrollments: &[Enrollment]) -> Section {
    let rows = enrollments
        .iter()
        .map(|e| {
            let (code, title) = match &e.course {
                Some(c) => (c.course_code.clone(), c.title.clone()),
                None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
            };
            vec![
                code,
                title,
                or_na(e.status),
                format::grade(e.grade),
                format::date(e.enrollment_date),
            ]
        })
        .collect();

    table_or_notice(
        "Course Enrollments",
        NO_ENROLLMENTS,
        &[
            ("Course Code", 20),
            ("Course Title", 30),
            ("Status", 15),
            ("Grade", 15),
            ("Enrollment Date", 20),
        ],
        rows,
    )
}

fn payments(payments: &[Payment]) -> Section {
    let rows = payments
        .iter()
        .map(|p| {
            vec![
                format::amount(p.amount),
                or_na(p.status),
                or_na(p.method),
                format::date(p.payment_date),
                format::date(p.due_date),
                or_na(p.transaction_id.as_deref()),
            ]
        })
        .collect();

    table_or_notice(
        "Payment History",
        NO_PAYMENTS,
        &[
            ("Amount", 15),
            ("Status", 15),
            ("Method", 15),
            ("Payment Date", 15),
            ("Due Date", 20),
            ("Transaction ID", 20),
        ],
        rows,
    )
}

fn interactions(interactions: &[Interaction]) -> Section {
    let rows = interactions
        .iter()
        .map(|i| {
            vec![
                or_na(i.interaction_type),
                i.subject.clone(),
                format::date_time(i.interaction_date),
                or_na(i.contacted_by.as_deref()),
                format::notes(i.notes.as_deref()),
            ]
        })
        .collect();

    table_or_notice(
        "Interaction History",
        NO_INTERACTIONS,
        &[
            ("Type", 15),
            ("Subject", 25),
            ("Date", 20),
            ("Contacted By", 20),
            ("Notes", 20),
        ],
        rows,
    )
}
