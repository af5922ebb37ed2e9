//! Infrastructure layer
//!
//! SQLite bootstrap and seed data, sea-orm repositories for the seven
//! record types, password hashing and JWT handling, and the axum server
//! with its shared [`AppState`].

pub mod auth;
pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
