// Domain entities and value objects
pub mod address;
pub mod conversions;
pub mod early_warning;
pub mod education;
pub mod health;
pub mod profile;
pub mod user;

// Re-export common types for easier imports
pub use address::{AddressOptions, AddressSelectRequest, AddressSelectResponse};
pub use early_warning::{EarlyWarning, EarlyWarningFacts};
pub use education::EducationRequest;
pub use health::{
    BloodPressureCategory, ChildRecordRequest, HealthRecordRequest, HealthRecordSummary, VisitRecordRequest,
};
pub use profile::{PartnerRequest, ProfileRequest};
pub use user::{CreateUserRequest, LoginRequest, LoginResponse, SignupRequest, UserSummary};
