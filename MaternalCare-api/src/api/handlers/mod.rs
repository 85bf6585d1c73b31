pub mod address;
pub mod auth;
pub mod children;
pub mod early_warning;
pub mod education;
pub mod health;
pub mod health_records;
pub mod profiles;
pub mod users;
pub mod visits;

pub use health::health_check;
