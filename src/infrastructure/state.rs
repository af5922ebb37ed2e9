//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AccountRepository, CrudScreen, Resource};
use crate::infrastructure::{
    SeaOrmCourseRepository, SeaOrmEnrollmentRepository, SeaOrmInstructorRepository,
    SeaOrmInteractionRepository, SeaOrmPaymentRepository, SeaOrmStudentRepository,
    SeaOrmUserRepository,
};
use crate::report::ReportService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    students: Arc<SeaOrmStudentRepository>,
    courses: Arc<SeaOrmCourseRepository>,
    instructors: Arc<SeaOrmInstructorRepository>,
    enrollments: Arc<SeaOrmEnrollmentRepository>,
    payments: Arc<SeaOrmPaymentRepository>,
    interactions: Arc<SeaOrmInteractionRepository>,
    users: Arc<SeaOrmUserRepository>,
    /// Student report generation, reading through the student repository
    pub reports: ReportService,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let students = Arc::new(SeaOrmStudentRepository::new(db.clone()));
        let reports = ReportService::new(students.clone());

        Self {
            students,
            courses: Arc::new(SeaOrmCourseRepository::new(db.clone())),
            instructors: Arc::new(SeaOrmInstructorRepository::new(db.clone())),
            enrollments: Arc::new(SeaOrmEnrollmentRepository::new(db.clone())),
            payments: Arc::new(SeaOrmPaymentRepository::new(db.clone())),
            interactions: Arc::new(SeaOrmInteractionRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            reports,
            db,
        }
    }

    /// The CRUD screen backing `resource`.
    pub fn screen(&self, resource: Resource) -> &dyn CrudScreen {
        match resource {
            Resource::Students => &*self.students,
            Resource::Courses => &*self.courses,
            Resource::Instructors => &*self.instructors,
            Resource::Enrollments => &*self.enrollments,
            Resource::Payments => &*self.payments,
            Resource::Interactions => &*self.interactions,
            Resource::Users => &*self.users,
        }
    }

    pub fn accounts(&self) -> &dyn AccountRepository {
        &*self.users
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
