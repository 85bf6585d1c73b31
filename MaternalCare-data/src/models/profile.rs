use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Four-level address plus free-form street line
///
/// Codes follow the Philippine Standard Geographic Code layout used by the
/// reference dataset: a barangay code starts with its municipality code, which
/// starts with its province code, which starts with its region code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Address {
    pub region_code: String,
    pub province_code: String,
    pub municipality_code: String,
    pub barangay_code: String,
    /// House number, street, purok or sitio
    pub street: Option<String>,
}

/// Storage model for a registered teen parent (the "mother" record)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    /// `year * 10000 + sequence`
    pub profile_id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub birth_date: NaiveDate,
    /// Age in whole years when the record was last saved
    pub age: i32,
    pub civil_status: String,
    pub religion: Option<String>,
    pub contact_number: Option<String>,
    pub educational_attainment: String,
    pub occupation: Option<String>,
    #[sqlx(flatten)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// "First Middle Last Suffix" with empty parts skipped
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Storage model for the partner ("father") linked one-to-one with a profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Partner {
    /// Same key as the owning profile
    pub profile_id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub birth_date: NaiveDate,
    pub age: i32,
    pub civil_status: String,
    pub occupation: Option<String>,
    pub contact_number: Option<String>,
    pub educational_attainment: String,
    #[sqlx(flatten)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
