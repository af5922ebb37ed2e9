use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use campus_office::auth::create_jwt;
use campus_office::domain::enums::UserRole;
use campus_office::models::{enrollment, interaction, payment, user};
use campus_office::{db, server};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
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

fn token(role: UserRole) -> String {
    create_jwt(&role.as_str().to_lowercase(), role).expect("Failed to create JWT")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    role: UserRole,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Authorization", format!("Bearer {}", token(role)));

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn student_payload(code: &str, email: &str) -> Value {
    json!({
        "student_id": code,
        "first_name": "  Toge ",
        "last_name": "Inumaki",
        "email": email,
        "phone": "",
        "status": "ACTIVE",
        "enrollment_date": "2024-09-01"
    })
}

#[tokio::test]
async fn test_student_create_trims_and_lists() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let (status, created) = send(
        &app,
        "POST",
        "/api/students",
        UserRole::Staff,
        Some(student_payload("STU-100", "toge@campus.test")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["first_name"], "Toge");
    assert_eq!(created["phone"], Value::Null);
    assert_eq!(created["enrollment_date"], "2024-09-01");

    let (status, listed) =
        send(&app, "GET", "/api/students?filter=inum", UserRole::Staff, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, none) = send(&app, "GET", "/api/students?filter=zzz", UserRole::Staff, None).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_filter_wildcards_match_literally() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    for (code, email) in [("STU-100", "one@campus.test"), ("STU_200", "two@campus.test")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/students",
            UserRole::Staff,
            Some(student_payload(code, email)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, percent) = send(&app, "GET", "/api/students?filter=%25", UserRole::Staff, None).await;
    assert!(percent.as_array().unwrap().is_empty());

    let (_, underscore) =
        send(&app, "GET", "/api/students?filter=STU_", UserRole::Staff, None).await;
    let underscore = underscore.as_array().unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0]["student_id"], "STU_200");

    let (status, users) = send(&app, "GET", "/api/users?filter=_", UserRole::Admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(users.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_collects_every_field_error() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/courses",
        UserRole::Admin,
        Some(json!({
            "course_code": " ",
            "title": "Cursed Techniques",
            "credits": 0,
            "duration_weeks": -2,
            "level": "EXPERT"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");

    let fields = body["fields"].as_array().unwrap();
    let message = |name: &str| {
        fields
            .iter()
            .find(|f| f["field"] == name)
            .map(|f| f["message"].as_str().unwrap().to_string())
    };
    assert_eq!(message("course_code").as_deref(), Some("Course code is required"));
    assert_eq!(message("credits").as_deref(), Some("Credits must be greater than 0"));
    assert_eq!(
        message("duration_weeks").as_deref(),
        Some("Duration must be greater than 0")
    );
    assert!(message("level").is_some());
    assert!(message("title").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        UserRole::Staff,
        Some(student_payload("STU-1", "same@campus.test")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        UserRole::Staff,
        Some(student_payload("STU-2", "same@campus.test")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_missing_record_is_named() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let (status, body) = send(&app, "GET", "/api/students/99", UserRole::Staff, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/students/99",
        UserRole::Staff,
        Some(student_payload("STU-1", "a@campus.test")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_a_student_removes_related_rows() {
    let db = setup_test_db().await;
    let app = server::build_router(db.clone(), &[]);

    let (_, student) = send(
        &app,
        "POST",
        "/api/students",
        UserRole::Staff,
        Some(student_payload("STU-7", "panda@campus.test")),
    )
    .await;
    let student_id = student["id"].as_i64().unwrap();

    let (status, course) = send(
        &app,
        "POST",
        "/api/courses",
        UserRole::Staff,
        Some(json!({
            "course_code": "JJK101",
            "title": "Barriers",
            "credits": 3,
            "duration_weeks": 12,
            "level": "BEGINNER"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, enrolled) = send(
        &app,
        "POST",
        "/api/enrollments",
        UserRole::Staff,
        Some(json!({
            "student_id": student_id,
            "course_id": course["id"],
            "enrollment_date": "2024-09-02",
            "status": "ENROLLED",
            "grade": 87.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrolled["course"]["course_code"], "JJK101");
    assert_eq!(enrolled["student_name"], "Toge Inumaki");

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        UserRole::Staff,
        Some(json!({
            "student_id": student_id,
            "amount": "1500.00",
            "due_date": "2024-10-01",
            "status": "PENDING"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/interactions",
        UserRole::Staff,
        Some(json!({
            "student_id": student_id,
            "type": "CALL",
            "subject": "Welcome call",
            "interaction_date": "2024-09-03T10:15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/students/{}", student_id),
        UserRole::Staff,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(enrollment::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(interaction::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_user_screen_hides_password_hash() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let user = json!({
        "username": "yaga",
        "first_name": "Masamichi",
        "last_name": "Yaga",
        "email": "yaga@campus.test",
        "role": "STAFF",
        "password": "dolls",
        "confirm_password": "dolls"
    });

    let (status, created) =
        send(&app, "POST", "/api/users", UserRole::Admin, Some(user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password_hash").is_none());
    assert_eq!(created["enabled"], true);

    let mut mismatched = user;
    mismatched["username"] = json!("yaga2");
    mismatched["email"] = json!("yaga2@campus.test");
    mismatched["confirm_password"] = json!("other");
    let (status, body) = send(&app, "POST", "/api/users", UserRole::Admin, Some(mismatched)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["message"], "Passwords do not match");
}

#[tokio::test]
async fn test_screen_schema_is_served() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let (status, schema) = send(&app, "GET", "/api/screens/payments", UserRole::Staff, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schema["title"], "Payments");

    let amount = schema["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "amount")
        .unwrap();
    assert_eq!(amount["required"], true);
    assert_eq!(amount["widget"], "NumberField");

    let (status, _) = send(&app, "GET", "/api/screens/unknown", UserRole::Staff, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_sums_pending_payments_exactly() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let (_, student) = send(
        &app,
        "POST",
        "/api/students",
        UserRole::Staff,
        Some(student_payload("STU-8", "miwa@campus.test")),
    )
    .await;

    for amount in ["0.10", "0.20"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/payments",
            UserRole::Staff,
            Some(json!({
                "student_id": student["id"],
                "amount": amount,
                "due_date": "2024-10-01",
                "status": "PENDING"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, dashboard) = send(&app, "GET", "/api/dashboard", UserRole::Instructor, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["active_students"], 1);
    assert_eq!(dashboard["pending_amount"], "Rs. 0.30");
    assert!(dashboard["recent_payments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check_is_public() {
    let db = setup_test_db().await;
    let app = server::build_router(db, &[]);

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "campus-office");
    assert_eq!(body["database"], "ok");
}
