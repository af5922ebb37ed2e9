use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use campus_office::auth::create_jwt;
use campus_office::domain::enums::UserRole;
use campus_office::infrastructure::SeaOrmStudentRepository;
use campus_office::models::{payment, user};
use campus_office::report::{
    ReportError, ReportService, SectionBody, assembler, generate_report, render_pdf,
};
use campus_office::{db, server};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database with one account per role
async fn setup_test_db() -> DatabaseConnection {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    for role in [UserRole::Admin, UserRole::Staff, UserRole::Instructor] {
        let now = chrono::Utc::now().to_rfc3339();
        let username = role.as_str().to_lowercase();
        let user = user::ActiveModel {
            email: Set(format!("{}@campus.test", username)),
            username: Set(username),
            password_hash: Set("unused".to_string()),
            first_name: Set("Test".to_string()),
            last_name: Set(role.as_str().to_string()),
            role: Set(role.as_str().to_string()),
            enabled: Set(true),
            account_non_locked: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        user::Entity::insert(user)
            .exec(&db)
            .await
            .expect("Failed to insert account");
    }
    db
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    let token = create_jwt("staff", UserRole::Staff).unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("POST")
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "POST {}", uri);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_student(app: &Router, code: &str) -> i32 {
    let student = post(
        app,
        "/api/students",
        json!({
            "student_id": code,
            "first_name": "Megumi",
            "last_name": "Fushiguro",
            "email": format!("{}@campus.test", code.to_lowercase()),
            "status": "ACTIVE",
            "enrollment_date": "2024-09-01"
        }),
    )
    .await;
    student["id"].as_i64().unwrap() as i32
}

fn service(db: &DatabaseConnection) -> ReportService {
    ReportService::new(Arc::new(SeaOrmStudentRepository::new(db.clone())))
}

fn table_rows(body: &SectionBody) -> &Vec<Vec<String>> {
    match body {
        SectionBody::Table { rows, .. } => rows,
        other => panic!("expected a table, got {:?}", other),
    }
}

#[tokio::test]
async fn test_report_without_history_shows_notices() {
    let db = setup_test_db().await;
    let app = server::build_router(db.clone(), &[]);
    let id = create_student(&app, "STU-10").await;

    let document = service(&db).document(id).await.unwrap();

    assert_eq!(document.file_name(), "student_report_STU-10.pdf");
    assert_eq!(document.sections.len(), 5);
    assert_eq!(document.sections[0].title, assembler::REPORT_TITLE);
    assert_eq!(
        document.sections[0].body,
        SectionBody::Heading {
            subtitle: "Megumi Fushiguro".to_string()
        }
    );

    let notices: Vec<&str> = document.sections[2..]
        .iter()
        .map(|s| match &s.body {
            SectionBody::Empty { notice } => notice.as_str(),
            other => panic!("expected a notice, got {:?}", other),
        })
        .collect();
    assert_eq!(
        notices,
        vec![
            "No enrollments found.",
            "No payments found.",
            "No interactions found."
        ]
    );
}

#[tokio::test]
async fn test_report_formats_history_rows() {
    let db = setup_test_db().await;
    let app = server::build_router(db.clone(), &[]);
    let id = create_student(&app, "STU-11").await;

    let course = post(
        &app,
        "/api/courses",
        json!({
            "course_code": "SHK200",
            "title": "Shikigami Summoning",
            "credits": 4,
            "duration_weeks": 10,
            "level": "INTERMEDIATE"
        }),
    )
    .await;

    for (date, grade) in [("2024-09-10", json!(87.5)), ("2024-09-11", Value::Null)] {
        post(
            &app,
            "/api/enrollments",
            json!({
                "student_id": id,
                "course_id": course["id"],
                "enrollment_date": date,
                "status": "ENROLLED",
                "grade": grade
            }),
        )
        .await;
    }

    post(
        &app,
        "/api/payments",
        json!({
            "student_id": id,
            "amount": "1500.00",
            "payment_date": "2024-09-15",
            "due_date": "2024-09-30",
            "status": "PAID",
            "method": "CARD"
        }),
    )
    .await;

    let long_notes = "Discussed the schedule for the upcoming practical exams in detail.";
    post(
        &app,
        "/api/interactions",
        json!({
            "student_id": id,
            "type": "MEETING",
            "subject": "Exam planning",
            "notes": long_notes,
            "interaction_date": "2024-09-20T14:05"
        }),
    )
    .await;

    let document = service(&db).document(id).await.unwrap();

    let enrollments = table_rows(&document.sections[2].body);
    assert_eq!(enrollments.len(), 2);
    assert_eq!(enrollments[0][0], "SHK200");
    assert_eq!(enrollments[0][3], "87.50");
    assert_eq!(enrollments[0][4], "10/09/2024");
    assert_eq!(enrollments[1][3], "N/A");
    assert_eq!(enrollments[1][4], "11/09/2024");

    let payments = table_rows(&document.sections[3].body);
    assert_eq!(payments[0][0], "Rs. 1500.00");
    assert_eq!(payments[0][1], "PAID");
    assert_eq!(payments[0][5], "N/A");

    let interactions = table_rows(&document.sections[4].body);
    assert_eq!(interactions[0][2], "20/09/2024 14:05");
    let notes = &interactions[0][4];
    assert!(notes.ends_with("..."));
    assert_eq!(notes.chars().count(), 50);
    assert!(long_notes.starts_with(notes.trim_end_matches("...")));
}

#[tokio::test]
async fn test_report_for_unknown_student() {
    let db = setup_test_db().await;
    let repo = SeaOrmStudentRepository::new(db);

    let err = generate_report(&repo, 404).await.unwrap_err();
    assert!(matches!(err, ReportError::NotFound));
    assert_eq!(err.to_string(), "Student not found");
}

#[tokio::test]
async fn test_unreadable_history_fails_generation() {
    let db = setup_test_db().await;
    let app = server::build_router(db.clone(), &[]);
    let id = create_student(&app, "STU-12").await;

    let now = chrono::Utc::now().to_rfc3339();
    payment::ActiveModel {
        student_id: Set(id),
        amount: Set("not-a-number".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let err = service(&db).pdf(id).await.unwrap_err();
    assert!(matches!(err, ReportError::GenerationFailure(_)));
}

// Two enrollments, payments and interactions: one row of each fully filled,
// one with every optional left out.
async fn populate_history(app: &Router, id: i32) {
    let course = post(
        app,
        "/api/courses",
        json!({
            "course_code": "CT300",
            "title": "Cursed Technique Theory",
            "credits": 3,
            "duration_weeks": 8,
            "level": "ADVANCED"
        }),
    )
    .await;

    for (date, grade) in [("2024-10-01", json!(87.125)), ("2024-10-02", Value::Null)] {
        post(
            app,
            "/api/enrollments",
            json!({
                "student_id": id,
                "course_id": course["id"],
                "enrollment_date": date,
                "status": "COMPLETED",
                "grade": grade
            }),
        )
        .await;
    }

    post(
        app,
        "/api/payments",
        json!({
            "student_id": id,
            "amount": "2750.50",
            "payment_date": "2024-10-05",
            "due_date": "2024-10-10",
            "status": "PAID",
            "method": "BANK_TRANSFER",
            "transaction_id": "TX-0091"
        }),
    )
    .await;
    post(
        app,
        "/api/payments",
        json!({
            "student_id": id,
            "amount": "300",
            "due_date": "2024-11-10",
            "status": "PENDING"
        }),
    )
    .await;

    post(
        app,
        "/api/interactions",
        json!({
            "student_id": id,
            "type": "EMAIL",
            "subject": "Transcript request",
            "notes": "Asked for an official transcript to be posted to the home address on file.",
            "interaction_date": "2024-10-07T08:30",
            "contacted_by": "staff"
        }),
    )
    .await;
    post(
        app,
        "/api/interactions",
        json!({
            "student_id": id,
            "type": "SMS",
            "subject": "Reminder",
            "interaction_date": "2024-11-01T17:45"
        }),
    )
    .await;
}

fn key_value<'a>(body: &'a SectionBody, label: &str) -> &'a str {
    match body {
        SectionBody::KeyValue { rows } => rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("no row labelled {}", label)),
        other => panic!("expected key/value rows, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repeated_reports_are_identical() {
    let db = setup_test_db().await;
    let app = server::build_router(db.clone(), &[]);
    let id = create_student(&app, "STU-13").await;
    populate_history(&app, id).await;

    let reports = service(&db);
    let first_document = reports.document(id).await.unwrap();
    let second_document = reports.document(id).await.unwrap();
    assert_eq!(first_document, second_document);

    let first_pdf = reports.pdf(id).await.unwrap();
    let second_pdf = reports.pdf(id).await.unwrap();
    assert!(first_pdf.bytes.starts_with(b"%PDF"));
    assert_eq!(first_pdf.bytes, second_pdf.bytes);
    assert_eq!(first_pdf.file_name, second_pdf.file_name);
    assert_eq!(first_pdf.bytes, render_pdf(&first_document));

    let enrollments = table_rows(&first_document.sections[2].body);
    assert_eq!(enrollments[0][3], "87.13");
    assert_eq!(enrollments[0][4], "01/10/2024");

    let payments = table_rows(&first_document.sections[3].body);
    assert_eq!(
        payments[0],
        vec!["Rs. 2750.50", "PAID", "BANK_TRANSFER", "05/10/2024", "10/10/2024", "TX-0091"]
    );

    let interactions = table_rows(&first_document.sections[4].body);
    assert_eq!(interactions[0][0], "EMAIL");
    assert_eq!(interactions[0][2], "07/10/2024 08:30");
    assert_eq!(interactions[0][3], "staff");
    assert_eq!(
        interactions[0][4],
        "Asked for an official transcript to be posted t..."
    );
}

#[tokio::test]
async fn test_absent_optionals_render_as_na() {
    let db = setup_test_db().await;
    let app = server::build_router(db.clone(), &[]);
    let id = create_student(&app, "STU-15").await;
    populate_history(&app, id).await;

    let document = service(&db).document(id).await.unwrap();

    let basic = &document.sections[1].body;
    assert_eq!(key_value(basic, "Phone:"), "N/A");
    assert_eq!(key_value(basic, "Graduation Date:"), "N/A");
    assert_eq!(key_value(basic, "Enrollment Date:"), "01/09/2024");

    let enrollments = table_rows(&document.sections[2].body);
    assert_eq!(enrollments[1][3], "N/A");

    let payments = table_rows(&document.sections[3].body);
    assert_eq!(payments[1][0], "Rs. 300");
    assert_eq!(payments[1][2], "N/A", "method");
    assert_eq!(payments[1][3], "N/A", "payment date");
    assert_eq!(payments[1][5], "N/A", "transaction id");

    let interactions = table_rows(&document.sections[4].body);
    assert_eq!(interactions[1][3], "N/A", "contacted by");
    assert_eq!(interactions[1][4], "N/A", "notes");
}

#[tokio::test]
async fn test_report_endpoint() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);
    let id = create_student(&app, "STU-14").await;
    let token = create_jwt("instructor", UserRole::Instructor).unwrap();

    let request = |uri: String| {
        Request::builder()
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    // 1. PDF by default
    let response = app
        .clone()
        .oneshot(request(format!("/api/students/{}/report", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"student_report_STU-14.pdf\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    // 2. JSON document
    let response = app
        .clone()
        .oneshot(request(format!("/api/students/{}/report?format=json", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let document: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(document["sections"][1]["body"]["kind"], "key_value");
    assert_eq!(document["sections"][1]["body"]["rows"][0][1], "STU-14");

    // 3. Unknown format
    let response = app
        .clone()
        .oneshot(request(format!("/api/students/{}/report?format=xls", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 4. Unknown student
    let response = app
        .oneshot(request("/api/students/999/report".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Student not found" }));
}

#[tokio::test]
async fn test_report_file_name_is_header_safe() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);
    let student = post(
        &app,
        "/api/students",
        json!({
            "student_id": "Q\"7\u{7}x",
            "first_name": "Kento",
            "last_name": "Nanami",
            "email": "nanami@campus.test"
        }),
    )
    .await;
    let token = create_jwt("staff", UserRole::Staff).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/students/{}/report", student["id"]))
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"student_report_Q_7_x.pdf\""
    );
}
