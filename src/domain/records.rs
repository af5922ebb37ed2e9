//! Typed records returned by the repositories and the forms they accept.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{
    CourseLevel, EnrollmentStatus, InteractionType, PaymentMethod, PaymentStatus, StudentStatus,
    UserRole,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub id: i32,
    pub student_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: Option<StudentStatus>,
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_date: Option<NaiveDate>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: i32,
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub duration_weeks: Option<i32>,
    pub level: Option<CourseLevel>,
    pub instructor_id: Option<i32>,
    pub instructor_name: Option<String>,
}

/// The slice of a course shown next to an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub id: i32,
    pub course_code: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instructor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub user_id: Option<i32>,
    pub course_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrollment {
    pub id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub course_id: i32,
    pub course: Option<CourseSummary>,
    pub enrollment_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub status: Option<EnrollmentStatus>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub amount: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub id: i32,
    pub student_id: i32,
    pub student_name: String,
    #[serde(rename = "type")]
    pub interaction_type: Option<InteractionType>,
    pub subject: String,
    pub notes: Option<String>,
    pub interaction_date: Option<NaiveDateTime>,
    pub contacted_by: Option<String>,
}

/// Login account. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub enabled: bool,
    pub account_non_locked: bool,
}

/// A student together with every row it owns, fully loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub student: Student,
    pub enrollments: Vec<Enrollment>,
    pub payments: Vec<Payment>,
    pub interactions: Vec<Interaction>,
}

// --- Forms ---

#[derive(Debug, Clone, Deserialize)]
pub struct StudentForm {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: Option<StudentStatus>,
    pub enrollment_date: Option<NaiveDate>,
    pub graduation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseForm {
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    pub duration_weeks: i32,
    pub level: CourseLevel,
    pub instructor_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstructorForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentForm {
    pub student_id: i32,
    pub course_id: i32,
    pub enrollment_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub status: EnrollmentStatus,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentForm {
    pub student_id: i32,
    pub amount: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionForm {
    pub student_id: i32,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub subject: String,
    pub notes: Option<String>,
    pub interaction_date: NaiveDateTime,
    pub contacted_by: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "enabled_by_default")]
    pub account_non_locked: bool,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordReset {
    pub password: String,
    pub confirm_password: String,
}
