pub mod course;
pub mod enrollment;
pub mod instructor;
pub mod interaction;
pub mod payment;
pub mod student;
pub mod user;
