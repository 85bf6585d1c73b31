use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use maternal_care_data::models::EnrollmentStatus;

/// Facts about a profile that the early-warning rules look at
///
/// This is also the body posted to a remote early-warning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EarlyWarningFacts {
    pub profile_id: i64,
    /// Age in whole years today
    pub age: i32,
    pub health_record_count: usize,
    /// Highest gravida across the profile's health records
    pub max_gravida: Option<i32>,
    /// Status of the most recent enrollment, if any
    pub latest_enrollment_status: Option<EnrollmentStatus>,
}

/// Early-warning flags for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EarlyWarning {
    pub profile_id: i64,
    pub repeated_pregnancy: bool,
    pub dropout_risk: bool,
    /// Human-readable reason for each raised flag
    #[serde(default)]
    pub reasons: Vec<String>,
    /// `rules` when computed locally, `remote` when returned by the external service
    pub source: String,
}
