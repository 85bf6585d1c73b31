// MaternalCare Data
// This crate owns the case-management tables and how they are stored

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Static address reference data (region > province > municipality > barangay)
pub mod reference;
