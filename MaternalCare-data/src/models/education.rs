use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

code_enum! {
    /// Kind of learning program
    ProgramType {
        /// Regular school
        Formal => "formal",
        /// Alternative Learning System
        Als => "als",
        /// Technical-vocational training
        Vocational => "vocational",
    }
}

code_enum! {
    EnrollmentStatus {
        Enrolled => "enrolled",
        Completed => "completed",
        DroppedOut => "dropped_out",
    }
}

/// Storage model for an education or training enrollment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EducationRecord {
    pub education_id: i64,
    pub profile_id: i64,
    #[sqlx(try_from = "String")]
    pub program_type: ProgramType,
    pub institution: String,
    /// Grade level for formal schooling, course name otherwise
    pub level_or_course: String,
    #[sqlx(try_from = "String")]
    pub enrollment_status: EnrollmentStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
