use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use maternal_care_data::models::{EnrollmentStatus, ProgramType};

/// Request payload for an education or training enrollment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EducationRequest {
    pub program_type: ProgramType,

    #[validate(length(min = 1, max = 200, message = "Institution is required (max 200 characters)"))]
    pub institution: String,

    /// Grade level for formal schooling, course name otherwise
    #[validate(length(min = 1, max = 200, message = "Level or course is required (max 200 characters)"))]
    pub level_or_course: String,

    pub enrollment_status: EnrollmentStatus,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "Remarks cannot exceed 1000 characters"))]
    pub remarks: Option<String>,
}
