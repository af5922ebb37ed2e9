//! Bootstrap account and demo data.

use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::domain::enums::{
    CourseLevel, EnrollmentStatus, InteractionType, PaymentMethod, PaymentStatus, StudentStatus,
    UserRole,
};
use crate::infrastructure::auth::hash_password;
use crate::models::{course, enrollment, instructor, interaction, payment, student, user};

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn account(
    username: &str,
    password: &str,
    first: &str,
    last: &str,
    role: UserRole,
) -> Result<user::ActiveModel, DbErr> {
    let password_hash = hash_password(password).map_err(DbErr::Custom)?;

    Ok(user::ActiveModel {
        username: Set(username.to_owned()),
        password_hash: Set(password_hash),
        first_name: Set(first.to_owned()),
        last_name: Set(last.to_owned()),
        email: Set(format!("{}@campus-office.local", username)),
        role: Set(role.as_str().to_owned()),
        enabled: Set(true),
        account_non_locked: Set(true),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    })
}

async fn insert_account(db: &DatabaseConnection, model: user::ActiveModel) -> Result<(), DbErr> {
    user::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Create the default `admin` account when nobody can sign in yet.
pub async fn ensure_admin(db: &DatabaseConnection) -> Result<(), DbErr> {
    if user::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let admin = account("admin", "admin", "System", "Administrator", UserRole::Admin)?;
    insert_account(db, admin).await?;
    tracing::warn!("No users found: created default account admin/admin, change its password");
    Ok(())
}

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    // 1. Users
    let admin = account("admin", "admin", "System", "Administrator", UserRole::Admin)?;
    insert_account(db, admin).await?;
    insert_account(db, account("staff", "staff123", "Office", "Staff", UserRole::Staff)?).await?;
    insert_account(
        db,
        account("instructor", "instructor456", "Nimal", "Fernando", UserRole::Instructor)?,
    )
    .await?;

    if student::Entity::find().count(db).await? > 0 {
        tracing::info!("Students already present, skipping demo records");
        return Ok(());
    }

    // 2. Instructors
    let instructor_login = user::Entity::find()
        .filter(user::Column::Username.eq("instructor"))
        .one(db)
        .await?
        .map(|u| u.id);

    let nimal = instructor::ActiveModel {
        first_name: Set("Nimal".to_owned()),
        last_name: Set("Fernando".to_owned()),
        email: Set("nimal.fernando@campus-office.local".to_owned()),
        phone: Set(Some("0771234567".to_owned())),
        specialization: Set(Some("Software Engineering".to_owned())),
        bio: Set(Some("Teaches programming fundamentals and design.".to_owned())),
        user_id: Set(instructor_login),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let kavindi = instructor::ActiveModel {
        first_name: Set("Kavindi".to_owned()),
        last_name: Set("Silva".to_owned()),
        email: Set("kavindi.silva@campus-office.local".to_owned()),
        specialization: Set(Some("Data Science".to_owned())),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    // 3. Courses
    let courses = [
        ("SE101", "Introduction to Programming", 3, 12, CourseLevel::Beginner, Some(nimal.id)),
        ("DS201", "Data Analysis with Python", 4, 16, CourseLevel::Intermediate, Some(kavindi.id)),
        ("NET150", "Computer Networks", 3, 10, CourseLevel::Beginner, None),
    ];

    let mut course_ids = Vec::new();
    for (code, title, credits, weeks, level, instructor_id) in courses {
        let saved = course::ActiveModel {
            course_code: Set(code.to_owned()),
            title: Set(title.to_owned()),
            credits: Set(Some(credits)),
            duration_weeks: Set(Some(weeks)),
            level: Set(Some(level.as_str().to_owned())),
            instructor_id: Set(instructor_id),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        course_ids.push(saved.id);
    }

    // 4. Students
    let students = [
        ("STU001", "Amaya", "Perera", StudentStatus::Active, "2024-01-15", None),
        ("STU002", "Dinuka", "Jayasinghe", StudentStatus::Active, "2024-02-01", None),
        (
            "STU003",
            "Sahan",
            "Wickramasinghe",
            StudentStatus::Graduated,
            "2022-09-01",
            Some("2024-08-30"),
        ),
    ];

    let mut student_ids = Vec::new();
    for (code, first, last, status, enrolled, graduated) in students {
        let saved = student::ActiveModel {
            student_id: Set(Some(code.to_owned())),
            first_name: Set(first.to_owned()),
            last_name: Set(last.to_owned()),
            email: Set(format!("{}.{}@students.campus-office.local", first, last).to_lowercase()),
            phone: Set(Some("0712345678".to_owned())),
            status: Set(Some(status.as_str().to_owned())),
            enrollment_date: Set(Some(enrolled.to_owned())),
            graduation_date: Set(graduated.map(str::to_owned)),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        student_ids.push(saved.id);
    }

    // 5. Enrollments
    let enrollments = [
        (0, 0, "2024-01-20", EnrollmentStatus::Enrolled, None),
        (0, 1, "2024-01-20", EnrollmentStatus::Completed, Some(87.5)),
        (1, 0, "2024-02-05", EnrollmentStatus::Enrolled, None),
        (2, 2, "2022-09-10", EnrollmentStatus::Completed, Some(90.0)),
    ];
    for (s, c, date, status, grade) in enrollments {
        enrollment::ActiveModel {
            student_id: Set(student_ids[s]),
            course_id: Set(course_ids[c]),
            enrollment_date: Set(Some(date.to_owned())),
            status: Set(Some(status.as_str().to_owned())),
            grade: Set(grade),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    // 6. Payments
    let payments = [
        (
            0,
            "1500.00",
            Some("2024-01-20"),
            "2024-01-31",
            PaymentStatus::Paid,
            Some(PaymentMethod::Card),
        ),
        (0, "2500.00", None, "2024-03-31", PaymentStatus::Pending, None),
        (1, "1500.00", None, "2024-02-28", PaymentStatus::Overdue, None),
    ];
    for (s, amount, paid_on, due, status, method) in payments {
        payment::ActiveModel {
            student_id: Set(student_ids[s]),
            amount: Set(amount.to_owned()),
            payment_date: Set(paid_on.map(str::to_owned)),
            due_date: Set(Some(due.to_owned())),
            status: Set(Some(status.as_str().to_owned())),
            method: Set(method.map(|m| m.as_str().to_owned())),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    // 7. Interactions
    interaction::ActiveModel {
        student_id: Set(student_ids[1]),
        r#type: Set(InteractionType::Call.as_str().to_owned()),
        subject: Set("Overdue payment reminder".to_owned()),
        notes: Set(Some(
            "Called about the February instalment; student will pay at the office next week."
                .to_owned(),
        )),
        interaction_date: Set(Some("2024-03-04T10:30:00".to_owned())),
        contacted_by: Set(Some("staff".to_owned())),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        "Seeded {} students, {} courses and related records",
        student_ids.len(),
        course_ids.len()
    );
    Ok(())
}
