// MaternalCare Domain
// This crate contains the business logic for the MaternalCare application

// Services that implement business logic
pub mod services;

// Authentication
pub mod auth;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the storage layer for convenience
pub use maternal_care_data::{database, models, reference, repository};
