//! Declarative descriptions of the CRUD screens.
//!
//! Every entity is described once: the grid columns a list view shows and the
//! form fields an editor binds, each with its kind and validation rules. The
//! generic screen in [`super::screen`] validates payloads against these
//! tables, and the UI renders its widgets from them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::str::FromStr;

use super::enums::{
    CourseLevel, EnrollmentStatus, InteractionType, PaymentMethod, PaymentStatus, StudentStatus,
    UserRole,
};
use super::errors::{DomainError, FieldError};
use FieldKind::{
    Boolean, Choice, Date, DateTime, Email, Integer, LongText, Number, Password, Reference, Text,
};
use Rule::{Between, Positive, Required, RequiredOnCreate};

/// Entity types exposed as CRUD screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Students,
    Courses,
    Instructors,
    Enrollments,
    Payments,
    Interactions,
    Users,
}

impl Resource {
    pub const ALL: &'static [Resource] = &[
        Resource::Students,
        Resource::Courses,
        Resource::Instructors,
        Resource::Enrollments,
        Resource::Payments,
        Resource::Interactions,
        Resource::Users,
    ];

    /// URL segment, e.g. `students`.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Courses => "courses",
            Resource::Instructors => "instructors",
            Resource::Enrollments => "enrollments",
            Resource::Payments => "payments",
            Resource::Interactions => "interactions",
            Resource::Users => "users",
        }
    }

    pub fn from_path(path: &str) -> Option<Resource> {
        Resource::ALL.iter().copied().find(|r| r.path() == path)
    }

    /// Singular noun used in user-facing messages.
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Students => "Student",
            Resource::Courses => "Course",
            Resource::Instructors => "Instructor",
            Resource::Enrollments => "Enrollment",
            Resource::Payments => "Payment",
            Resource::Interactions => "Interaction",
            Resource::Users => "User",
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        match self {
            Resource::Students => &STUDENT_SCHEMA,
            Resource::Courses => &COURSE_SCHEMA,
            Resource::Instructors => &INSTRUCTOR_SCHEMA,
            Resource::Enrollments => &ENROLLMENT_SCHEMA,
            Resource::Payments => &PAYMENT_SCHEMA,
            Resource::Interactions => &INTERACTION_SCHEMA,
            Resource::Users => &USER_SCHEMA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Free text limited to the given number of characters.
    LongText(usize),
    Email,
    Password,
    Integer,
    /// Exact decimal, carried as a string.
    Decimal,
    Number,
    Date,
    DateTime,
    Choice(&'static [&'static str]),
    Reference(Resource),
    Boolean,
}

impl FieldKind {
    pub fn widget(&self) -> &'static str {
        match self {
            FieldKind::Text => "TextField",
            FieldKind::LongText(_) => "TextArea",
            FieldKind::Email => "EmailField",
            FieldKind::Password => "PasswordField",
            FieldKind::Integer => "IntegerField",
            FieldKind::Decimal | FieldKind::Number => "NumberField",
            FieldKind::Date => "DatePicker",
            FieldKind::DateTime => "DateTimePicker",
            FieldKind::Choice(_) | FieldKind::Reference(_) => "ComboBox",
            FieldKind::Boolean => "Checkbox",
        }
    }

    /// Decode a non-null, already trimmed value into its canonical JSON form.
    fn decode(&self, value: &Value) -> Result<Value, String> {
        match self {
            FieldKind::Text | FieldKind::Password => value
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| "Must be text".to_string()),
            FieldKind::LongText(max) => {
                let text = value.as_str().ok_or_else(|| "Must be text".to_string())?;
                if text.chars().count() > *max {
                    return Err(format!("Must be at most {} characters", max));
                }
                Ok(Value::String(text.to_string()))
            }
            FieldKind::Email => {
                let text = value.as_str().ok_or_else(|| "Must be text".to_string())?;
                if !is_valid_email(text) {
                    return Err("Invalid email format".to_string());
                }
                Ok(Value::String(text.to_string()))
            }
            FieldKind::Integer => as_integer(value)
                .map(Value::from)
                .ok_or_else(|| "Must be a whole number".to_string()),
            FieldKind::Decimal => as_decimal(value)
                .map(|d| Value::String(d.to_string()))
                .ok_or_else(|| "Must be a decimal number".to_string()),
            FieldKind::Number => as_decimal(value)
                .and_then(|d| d.to_string().parse::<f64>().ok())
                .map(Value::from)
                .ok_or_else(|| "Must be a number".to_string()),
            FieldKind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .ok_or_else(|| "Must be a date (YYYY-MM-DD)".to_string()),
            FieldKind::DateTime => value
                .as_str()
                .and_then(parse_date_time)
                .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
                .ok_or_else(|| "Must be a date and time (YYYY-MM-DDTHH:MM)".to_string()),
            FieldKind::Choice(options) => value
                .as_str()
                .filter(|s| options.contains(s))
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| format!("Must be one of: {}", options.join(", "))),
            FieldKind::Reference(_) => as_integer(value)
                .filter(|id| *id > 0)
                .map(Value::from)
                .ok_or_else(|| "Must reference an existing record id".to_string()),
            FieldKind::Boolean => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| "Must be true or false".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required(&'static str),
    /// Required only when creating a record (e.g. a user's password).
    RequiredOnCreate(&'static str),
    Positive(&'static str),
    Between {
        min: i64,
        max: i64,
        message: &'static str,
    },
}

impl Rule {
    fn describe(&self) -> Value {
        match self {
            Rule::Required(message) => json!({ "rule": "required", "message": message }),
            Rule::RequiredOnCreate(message) => {
                json!({ "rule": "required_on_create", "message": message })
            }
            Rule::Positive(message) => json!({ "rule": "positive", "message": message }),
            Rule::Between { min, max, message } => {
                json!({ "rule": "between", "min": min, "max": max, "message": message })
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        rules: &'static [Rule],
    ) -> Self {
        Self {
            name,
            label,
            kind,
            rules,
        }
    }

    fn required_message(&self, mode: FormMode) -> Option<&'static str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Required(message) => Some(*message),
            Rule::RequiredOnCreate(message) if mode == FormMode::Create => Some(*message),
            _ => None,
        })
    }

    /// Returns the canonical value, `None` when the field is absent.
    fn check(&self, raw: Option<&Value>, mode: FormMode) -> Result<Option<Value>, String> {
        let value = raw.and_then(|v| normalize(v, self.kind));

        let Some(value) = value else {
            return match self.required_message(mode) {
                Some(message) => Err(message.to_string()),
                None => Ok(None),
            };
        };

        let decoded = self.kind.decode(&value)?;

        for rule in self.rules {
            match rule {
                Rule::Positive(message) => {
                    if as_decimal(&decoded).is_none_or(|d| d <= Decimal::ZERO) {
                        return Err(message.to_string());
                    }
                }
                Rule::Between { min, max, message } => {
                    let in_range = as_decimal(&decoded).is_some_and(|d| {
                        d >= Decimal::from(*min) && d <= Decimal::from(*max)
                    });
                    if !in_range {
                        return Err(message.to_string());
                    }
                }
                Rule::Required(_) | Rule::RequiredOnCreate(_) => {}
            }
        }

        Ok(Some(decoded))
    }

    fn describe(&self, mode_required: bool) -> Value {
        let (options, reference) = match self.kind {
            FieldKind::Choice(options) => (Some(options), None),
            FieldKind::Reference(resource) => (None, Some(resource.path())),
            _ => (None, None),
        };
        json!({
            "name": self.name,
            "label": self.label,
            "widget": self.kind.widget(),
            "required": mode_required,
            "options": options,
            "reference": reference,
            "rules": self.rules.iter().map(Rule::describe).collect::<Vec<_>>(),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridColumn {
    pub key: &'static str,
    pub header: &'static str,
}

impl GridColumn {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub resource: Resource,
    pub title: &'static str,
    pub columns: &'static [GridColumn],
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a submitted form, collecting every field error.
    ///
    /// On success returns a JSON object holding only the known fields in
    /// their canonical form, ready to be decoded into the typed form.
    pub fn validate(&self, payload: &Value, mode: FormMode) -> Result<Value, DomainError> {
        let Some(input) = payload.as_object() else {
            return Err(DomainError::invalid("", "Expected a JSON object"));
        };

        let mut normalized = Map::new();
        let mut errors = Vec::new();

        for field in self.fields {
            match field.check(input.get(field.name), mode) {
                Ok(Some(value)) => {
                    normalized.insert(field.name.to_string(), value);
                }
                Ok(None) => {}
                Err(message) => errors.push(FieldError::new(field.name, message)),
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(normalized))
        } else {
            Err(DomainError::Invalid(errors))
        }
    }

    /// Screen description served to the UI.
    pub fn describe(&self) -> Value {
        json!({
            "resource": self.resource.path(),
            "title": self.title,
            "columns": self.columns,
            "fields": self
                .fields
                .iter()
                .map(|f| f.describe(f.required_message(FormMode::Create).is_some()))
                .collect::<Vec<_>>(),
        })
    }
}

/// Trim strings and drop empty ones. Passwords keep their whitespace.
fn normalize(value: &Value, kind: FieldKind) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if kind == FieldKind::Password => {
            (!s.is_empty()).then(|| Value::String(s.clone()))
        }
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
        other => Some(other.clone()),
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").ok())
}

/// Minimal structural e-mail check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

// --- Screen tables ---

pub static STUDENT_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Students,
    title: "Students",
    columns: &[
        GridColumn::new("student_id", "Student ID"),
        GridColumn::new("first_name", "First Name"),
        GridColumn::new("last_name", "Last Name"),
        GridColumn::new("email", "Email"),
        GridColumn::new("phone", "Phone"),
        GridColumn::new("status", "Status"),
        GridColumn::new("enrollment_date", "Enrollment Date"),
    ],
    fields: &[
        FieldSpec::new("student_id", "Student ID", Text, &[Required("Student ID is required")]),
        FieldSpec::new("first_name", "First Name", Text, &[Required("First name is required")]),
        FieldSpec::new("last_name", "Last Name", Text, &[Required("Last name is required")]),
        FieldSpec::new("email", "Email", Email, &[Required("Email is required")]),
        FieldSpec::new("phone", "Phone", Text, &[]),
        FieldSpec::new("status", "Status", Choice(StudentStatus::NAMES), &[]),
        FieldSpec::new("enrollment_date", "Enrollment Date", Date, &[]),
        FieldSpec::new("graduation_date", "Graduation Date", Date, &[]),
    ],
};

pub static COURSE_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Courses,
    title: "Courses",
    columns: &[
        GridColumn::new("course_code", "Code"),
        GridColumn::new("title", "Title"),
        GridColumn::new("credits", "Credits"),
        GridColumn::new("duration_weeks", "Duration (weeks)"),
        GridColumn::new("level", "Level"),
        GridColumn::new("instructor_name", "Instructor"),
    ],
    fields: &[
        FieldSpec::new("course_code", "Course Code", Text, &[Required("Course code is required")]),
        FieldSpec::new("title", "Title", Text, &[Required("Title is required")]),
        FieldSpec::new("description", "Description", LongText(2000), &[]),
        FieldSpec::new(
            "credits",
            "Credits",
            Integer,
            &[Required("Credits is required"), Positive("Credits must be greater than 0")],
        ),
        FieldSpec::new(
            "duration_weeks",
            "Duration (weeks)",
            Integer,
            &[Required("Duration is required"), Positive("Duration must be greater than 0")],
        ),
        FieldSpec::new(
            "level",
            "Level",
            Choice(CourseLevel::NAMES),
            &[Required("Level is required")],
        ),
        FieldSpec::new("instructor_id", "Instructor", Reference(Resource::Instructors), &[]),
    ],
};

pub static INSTRUCTOR_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Instructors,
    title: "Instructors",
    columns: &[
        GridColumn::new("first_name", "First Name"),
        GridColumn::new("last_name", "Last Name"),
        GridColumn::new("email", "Email"),
        GridColumn::new("phone", "Phone"),
        GridColumn::new("specialization", "Specialization"),
        GridColumn::new("course_count", "Courses"),
    ],
    fields: &[
        FieldSpec::new("first_name", "First Name", Text, &[Required("First name is required")]),
        FieldSpec::new("last_name", "Last Name", Text, &[Required("Last name is required")]),
        FieldSpec::new("email", "Email", Email, &[Required("Email is required")]),
        FieldSpec::new("phone", "Phone", Text, &[]),
        FieldSpec::new("specialization", "Specialization", Text, &[]),
        FieldSpec::new("bio", "Bio", LongText(1000), &[]),
        FieldSpec::new("user_id", "Login Account", Reference(Resource::Users), &[]),
    ],
};

pub static ENROLLMENT_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Enrollments,
    title: "Enrollments",
    columns: &[
        GridColumn::new("student_name", "Student"),
        GridColumn::new("course.title", "Course"),
        GridColumn::new("enrollment_date", "Enrollment Date"),
        GridColumn::new("status", "Status"),
        GridColumn::new("grade", "Grade"),
        GridColumn::new("completion_date", "Completion Date"),
    ],
    fields: &[
        FieldSpec::new(
            "student_id",
            "Student",
            Reference(Resource::Students),
            &[Required("Student is required")],
        ),
        FieldSpec::new(
            "course_id",
            "Course",
            Reference(Resource::Courses),
            &[Required("Course is required")],
        ),
        FieldSpec::new(
            "enrollment_date",
            "Enrollment Date",
            Date,
            &[Required("Enrollment date is required")],
        ),
        FieldSpec::new("completion_date", "Completion Date", Date, &[]),
        FieldSpec::new(
            "status",
            "Status",
            Choice(EnrollmentStatus::NAMES),
            &[Required("Status is required")],
        ),
        FieldSpec::new(
            "grade",
            "Grade (%)",
            Number,
            &[Between { min: 0, max: 100, message: "Grade must be between 0 and 100" }],
        ),
        FieldSpec::new("feedback", "Feedback", LongText(1000), &[]),
    ],
};

pub static PAYMENT_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Payments,
    title: "Payments",
    columns: &[
        GridColumn::new("student_name", "Student"),
        GridColumn::new("amount", "Amount"),
        GridColumn::new("payment_date", "Payment Date"),
        GridColumn::new("due_date", "Due Date"),
        GridColumn::new("status", "Status"),
        GridColumn::new("method", "Method"),
        GridColumn::new("transaction_id", "Transaction ID"),
    ],
    fields: &[
        FieldSpec::new(
            "student_id",
            "Student",
            Reference(Resource::Students),
            &[Required("Student is required")],
        ),
        FieldSpec::new(
            "amount",
            "Amount",
            FieldKind::Decimal,
            &[Required("Amount is required"), Positive("Amount must be greater than 0")],
        ),
        FieldSpec::new("payment_date", "Payment Date", Date, &[]),
        FieldSpec::new("due_date", "Due Date", Date, &[Required("Due date is required")]),
        FieldSpec::new(
            "status",
            "Status",
            Choice(PaymentStatus::NAMES),
            &[Required("Status is required")],
        ),
        FieldSpec::new("method", "Payment Method", Choice(PaymentMethod::NAMES), &[]),
        FieldSpec::new("transaction_id", "Transaction ID", Text, &[]),
        FieldSpec::new("notes", "Notes", LongText(500), &[]),
    ],
};

pub static INTERACTION_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Interactions,
    title: "Interactions",
    columns: &[
        GridColumn::new("student_name", "Student"),
        GridColumn::new("type", "Type"),
        GridColumn::new("subject", "Subject"),
        GridColumn::new("interaction_date", "Date"),
        GridColumn::new("contacted_by", "Contacted By"),
    ],
    fields: &[
        FieldSpec::new(
            "student_id",
            "Student",
            Reference(Resource::Students),
            &[Required("Student is required")],
        ),
        FieldSpec::new(
            "type",
            "Type",
            Choice(InteractionType::NAMES),
            &[Required("Interaction type is required")],
        ),
        FieldSpec::new("subject", "Subject", Text, &[Required("Subject is required")]),
        FieldSpec::new("notes", "Notes", LongText(3000), &[]),
        FieldSpec::new(
            "interaction_date",
            "Interaction Date",
            DateTime,
            &[Required("Interaction date is required")],
        ),
        FieldSpec::new("contacted_by", "Contacted By", Text, &[]),
    ],
};

pub static USER_SCHEMA: EntitySchema = EntitySchema {
    resource: Resource::Users,
    title: "Users",
    columns: &[
        GridColumn::new("username", "Username"),
        GridColumn::new("first_name", "First Name"),
        GridColumn::new("last_name", "Last Name"),
        GridColumn::new("email", "Email"),
        GridColumn::new("role", "Role"),
        GridColumn::new("enabled", "Enabled"),
        GridColumn::new("account_non_locked", "Unlocked"),
    ],
    fields: &[
        FieldSpec::new("username", "Username", Text, &[Required("Username is required")]),
        FieldSpec::new("first_name", "First Name", Text, &[Required("First name is required")]),
        FieldSpec::new("last_name", "Last Name", Text, &[Required("Last name is required")]),
        FieldSpec::new("email", "Email", Email, &[Required("Email is required")]),
        FieldSpec::new("role", "Role", Choice(UserRole::NAMES), &[Required("Role is required")]),
        FieldSpec::new("enabled", "Enabled", Boolean, &[]),
        FieldSpec::new("account_non_locked", "Account Non Locked", Boolean, &[]),
        FieldSpec::new(
            "password",
            "Password",
            Password,
            &[RequiredOnCreate("Password is required for new users")],
        ),
        FieldSpec::new(
            "confirm_password",
            "Confirm Password",
            Password,
            &[RequiredOnCreate("Please confirm password")],
        ),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn field_messages(err: DomainError) -> Vec<(String, String)> {
        match err {
            DomainError::Invalid(errors) => errors
                .into_iter()
                .map(|e| (e.field, e.message))
                .collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn collects_every_missing_required_field() {
        let err = STUDENT_SCHEMA
            .validate(&json!({ "phone": "0771234567" }), FormMode::Create)
            .unwrap_err();
        let messages = field_messages(err);
        assert_eq!(
            messages,
            vec![
                ("student_id".to_string(), "Student ID is required".to_string()),
                ("first_name".to_string(), "First name is required".to_string()),
                ("last_name".to_string(), "Last name is required".to_string()),
                ("email".to_string(), "Email is required".to_string()),
            ]
        );
    }

    #[test]
    fn blank_strings_count_as_missing_and_values_are_trimmed() {
        let normalized = STUDENT_SCHEMA
            .validate(
                &json!({
                    "student_id": "  ST-001 ",
                    "first_name": "Satoru",
                    "last_name": "Gojo",
                    "email": "gojo@nibm.lk",
                    "phone": "   ",
                    "unknown": "dropped"
                }),
                FormMode::Create,
            )
            .unwrap();
        assert_eq!(normalized["student_id"], "ST-001");
        assert!(normalized.get("phone").is_none());
        assert!(normalized.get("unknown").is_none());
    }

    #[test]
    fn rejects_malformed_email() {
        let err = INSTRUCTOR_SCHEMA
            .validate(
                &json!({ "first_name": "A", "last_name": "B", "email": "not-an-email" }),
                FormMode::Create,
            )
            .unwrap_err();
        assert_eq!(
            field_messages(err),
            vec![("email".to_string(), "Invalid email format".to_string())]
        );
        assert!(is_valid_email("john.doe@example.com"));
        assert!(!is_valid_email("john@localhost"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn course_numbers_must_be_positive() {
        let err = COURSE_SCHEMA
            .validate(
                &json!({
                    "course_code": "CS101",
                    "title": "Intro",
                    "credits": 0,
                    "duration_weeks": -2,
                    "level": "BEGINNER"
                }),
                FormMode::Create,
            )
            .unwrap_err();
        assert_eq!(
            field_messages(err),
            vec![
                ("credits".to_string(), "Credits must be greater than 0".to_string()),
                ("duration_weeks".to_string(), "Duration must be greater than 0".to_string()),
            ]
        );
    }

    #[test]
    fn grade_range_is_inclusive_and_optional() {
        let base = json!({
            "student_id": 1,
            "course_id": 2,
            "enrollment_date": "2024-01-15",
            "status": "ENROLLED"
        });
        assert!(ENROLLMENT_SCHEMA.validate(&base, FormMode::Create).is_ok());

        let cases = [
            (json!(0), true),
            (json!(100), true),
            (json!(100.5), false),
            (json!(-1), false),
        ];
        for (grade, ok) in cases {
            let mut payload = base.clone();
            payload["grade"] = grade;
            assert_eq!(ENROLLMENT_SCHEMA.validate(&payload, FormMode::Create).is_ok(), ok);
        }
    }

    #[test]
    fn amount_stays_exact() {
        let normalized = PAYMENT_SCHEMA
            .validate(
                &json!({
                    "student_id": 3,
                    "amount": "1500.00",
                    "due_date": "2024-02-01",
                    "status": "PENDING"
                }),
                FormMode::Create,
            )
            .unwrap();
        assert_eq!(normalized["amount"], "1500.00");

        let err = PAYMENT_SCHEMA
            .validate(
                &json!({
                    "student_id": 3,
                    "amount": "0",
                    "due_date": "2024-02-01",
                    "status": "PENDING"
                }),
                FormMode::Create,
            )
            .unwrap_err();
        assert_eq!(
            field_messages(err),
            vec![("amount".to_string(), "Amount must be greater than 0".to_string())]
        );
    }

    #[test]
    fn choices_and_dates_are_checked() {
        let err = INTERACTION_SCHEMA
            .validate(
                &json!({
                    "student_id": 1,
                    "type": "FAX",
                    "subject": "Follow-up",
                    "interaction_date": "yesterday"
                }),
                FormMode::Create,
            )
            .unwrap_err();
        let messages = field_messages(err);
        assert_eq!(messages[0].0, "type");
        assert!(messages[0].1.starts_with("Must be one of: CALL, EMAIL"));
        assert_eq!(messages[1].0, "interaction_date");
    }

    #[test]
    fn date_time_without_seconds_is_normalized() {
        let normalized = INTERACTION_SCHEMA
            .validate(
                &json!({
                    "student_id": 1,
                    "type": "CALL",
                    "subject": "Fees",
                    "interaction_date": "2024-03-05T14:30"
                }),
                FormMode::Create,
            )
            .unwrap();
        assert_eq!(normalized["interaction_date"], "2024-03-05T14:30:00");
    }

    #[test]
    fn password_required_only_on_create() {
        let payload = json!({
            "username": "staff",
            "first_name": "Staff",
            "last_name": "Member",
            "email": "staff@example.com",
            "role": "STAFF"
        });
        assert!(USER_SCHEMA.validate(&payload, FormMode::Update).is_ok());
        let err = USER_SCHEMA.validate(&payload, FormMode::Create).unwrap_err();
        let messages = field_messages(err);
        assert_eq!(
            messages,
            vec![
                ("password".to_string(), "Password is required for new users".to_string()),
                ("confirm_password".to_string(), "Please confirm password".to_string()),
            ]
        );
    }

    #[test]
    fn every_resource_describes_its_screen() {
        for resource in Resource::ALL {
            let description = resource.schema().describe();
            assert_eq!(description["resource"], resource.path());
            assert_eq!(Resource::from_path(resource.path()), Some(*resource));
        }
        let course = COURSE_SCHEMA.describe();
        assert_eq!(course["fields"][5]["widget"], "ComboBox");
        assert_eq!(course["fields"][5]["options"][0], "BEGINNER");
    }
}
