use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use maternal_care_data::models::{PregnancyStatus, Sex, VisitType};

/// Request payload for a maternal health record
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct HealthRecordRequest {
    /// Last menstrual period
    pub lmp: Option<NaiveDate>,

    /// Expected date of delivery, derived from `lmp` when omitted
    pub edd: Option<NaiveDate>,

    #[validate(range(min = 1, max = 20, message = "Gravida must be between 1 and 20"))]
    pub gravida: i32,

    #[validate(range(min = 0, max = 20, message = "Parity must be between 0 and 20"))]
    pub parity: i32,

    #[validate(range(min = 50.0, max = 250.0, message = "Height must be between 50 and 250 cm"))]
    pub height_cm: Option<f64>,

    #[validate(range(min = 20.0, max = 300.0, message = "Weight must be between 20 and 300 kg"))]
    pub weight_kg: Option<f64>,

    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub systolic: Option<i32>,

    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub diastolic: Option<i32>,

    /// Tetanus-diphtheria doses received so far
    #[serde(default)]
    #[validate(range(min = 0, max = 5, message = "Td doses must be between 0 and 5"))]
    pub td_doses: i32,

    pub td_last_dose: Option<NaiveDate>,

    /// Defaults to `pregnant`
    pub pregnancy_status: Option<PregnancyStatus>,

    #[validate(length(max = 1000, message = "Remarks cannot exceed 1000 characters"))]
    pub remarks: Option<String>,
}

/// Request payload for a child born from a recorded pregnancy
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChildRecordRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required (max 100 characters)"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required (max 100 characters)"))]
    pub last_name: String,

    pub sex: Sex,

    pub birth_date: NaiveDate,

    #[validate(range(min = 0.3, max = 7.0, message = "Birth weight must be between 0.3 and 7 kg"))]
    pub birth_weight_kg: Option<f64>,

    #[validate(range(min = 20.0, max = 70.0, message = "Birth length must be between 20 and 70 cm"))]
    pub birth_length_cm: Option<f64>,

    #[validate(length(max = 200, message = "Place of delivery cannot exceed 200 characters"))]
    pub place_of_delivery: Option<String>,

    /// Vaccine codes already given, e.g. `BCG`, `PENTA1`
    #[serde(default)]
    pub immunizations: Vec<String>,
}

/// Request payload for a prenatal or postnatal visit
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VisitRecordRequest {
    pub visit_type: VisitType,

    pub visit_date: NaiveDate,

    #[validate(range(min = 20.0, max = 300.0, message = "Weight must be between 20 and 300 kg"))]
    pub weight_kg: Option<f64>,

    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub systolic: Option<i32>,

    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub diastolic: Option<i32>,

    #[validate(range(min = 0.0, max = 50.0, message = "Fundal height must be between 0 and 50 cm"))]
    pub fundal_height_cm: Option<f64>,

    #[validate(range(min = 60, max = 220, message = "Fetal heart rate must be between 60 and 220 bpm"))]
    pub fetal_heart_rate: Option<i32>,

    #[validate(length(max = 200, message = "Attended by cannot exceed 200 characters"))]
    pub attended_by: Option<String>,

    #[validate(length(max = 1000, message = "Remarks cannot exceed 1000 characters"))]
    pub remarks: Option<String>,
}

/// Blood pressure category based on measurements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    /// Systolic < 120 and diastolic < 80
    Normal,

    /// Systolic 120-129 and diastolic < 80
    Elevated,

    /// Systolic 130-139 or diastolic 80-89
    Hypertension1,

    /// Systolic >= 140 or diastolic >= 90
    Hypertension2,

    /// Systolic >= 180 or diastolic >= 120
    HypertensiveCrisis,
}

impl std::fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "Hypertension Stage 1",
            BloodPressureCategory::Hypertension2 => "Hypertension Stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        };
        f.write_str(label)
    }
}

/// Derived view of one pregnancy
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordSummary {
    pub health_id: i64,
    pub profile_id: i64,

    /// Date the summary was computed for
    pub as_of: NaiveDate,

    /// Completed weeks since LMP, only while pregnant
    pub gestational_age_weeks: Option<i64>,

    /// Stored EDD, or LMP + 280 days
    pub edd: Option<NaiveDate>,

    pub prenatal_visits: usize,
    pub postnatal_visits: usize,

    /// Category of the most recent reading (latest visit with both values, else the record itself)
    pub latest_bp_category: Option<BloodPressureCategory>,

    /// Any reading at or above 140/90
    pub hypertension_flag: bool,

    pub children: usize,
}
