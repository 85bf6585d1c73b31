use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use maternal_care_data::models::Address;

/// Request payload for registering or editing a teen-parent profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required (max 100 characters)"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name cannot exceed 100 characters"))]
    pub middle_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name is required (max 100 characters)"))]
    pub last_name: String,

    #[validate(length(max = 20, message = "Suffix cannot exceed 20 characters"))]
    pub suffix: Option<String>,

    /// Age is derived from this on every save
    pub birth_date: NaiveDate,

    #[validate(length(min = 1, max = 30, message = "Civil status is required"))]
    pub civil_status: String,

    #[validate(length(max = 100, message = "Religion cannot exceed 100 characters"))]
    pub religion: Option<String>,

    #[validate(length(max = 30, message = "Contact number cannot exceed 30 characters"))]
    pub contact_number: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Educational attainment is required"))]
    pub educational_attainment: String,

    #[validate(length(max = 100, message = "Occupation cannot exceed 100 characters"))]
    pub occupation: Option<String>,

    /// Ignored when `copy_address_from_partner` is set
    #[serde(default)]
    pub address: Address,

    /// Replace this profile's address with the partner's (updates only)
    #[serde(default)]
    pub copy_address_from_partner: bool,
}

/// Request payload for the partner linked to a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PartnerRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required (max 100 characters)"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name cannot exceed 100 characters"))]
    pub middle_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name is required (max 100 characters)"))]
    pub last_name: String,

    #[validate(length(max = 20, message = "Suffix cannot exceed 20 characters"))]
    pub suffix: Option<String>,

    pub birth_date: NaiveDate,

    #[validate(length(min = 1, max = 30, message = "Civil status is required"))]
    pub civil_status: String,

    #[validate(length(max = 100, message = "Occupation cannot exceed 100 characters"))]
    pub occupation: Option<String>,

    #[validate(length(max = 30, message = "Contact number cannot exceed 30 characters"))]
    pub contact_number: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Educational attainment is required"))]
    pub educational_attainment: String,

    /// Ignored when `copy_address_from_profile` is set
    #[serde(default)]
    pub address: Address,

    /// Use the profile's address instead of `address`
    #[serde(default)]
    pub copy_address_from_profile: bool,
}
