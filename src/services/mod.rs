//! Services Layer
//!
//! Read-side business logic that spans several entities.

pub mod dashboard_service;
