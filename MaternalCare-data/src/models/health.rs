use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

code_enum! {
    /// Where a pregnancy currently stands
    PregnancyStatus {
        Pregnant => "pregnant",
        Delivered => "delivered",
        Miscarriage => "miscarriage",
    }
}

code_enum! {
    /// Kind of follow-up visit
    VisitType {
        Prenatal => "prenatal",
        Postnatal => "postnatal",
    }
}

code_enum! {
    Sex {
        Male => "male",
        Female => "female",
    }
}

/// Storage model for a maternal health record (one per pregnancy)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HealthRecord {
    pub health_id: i64,
    pub profile_id: i64,
    /// Last menstrual period
    pub lmp: Option<NaiveDate>,
    /// Expected date of delivery
    pub edd: Option<NaiveDate>,
    /// Number of pregnancies including this one
    pub gravida: i32,
    /// Number of births past 20 weeks
    pub parity: i32,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    /// Tetanus-diphtheria doses received so far
    pub td_doses: i32,
    pub td_last_dose: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub pregnancy_status: PregnancyStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage model for a child born from a recorded pregnancy
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChildRecord {
    pub child_id: i64,
    pub health_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "String")]
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub birth_weight_kg: Option<f64>,
    pub birth_length_cm: Option<f64>,
    pub place_of_delivery: Option<String>,
    /// Vaccine codes already given
    pub immunizations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage model for a prenatal or postnatal visit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VisitRecord {
    pub visit_id: i64,
    pub health_id: i64,
    #[sqlx(try_from = "String")]
    pub visit_type: VisitType,
    pub visit_date: NaiveDate,
    pub weight_kg: Option<f64>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub fundal_height_cm: Option<f64>,
    pub fetal_heart_rate: Option<i32>,
    pub attended_by: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
