use chrono::NaiveDate;

use maternal_care_data::models::{HealthRecord, PregnancyStatus, VisitRecord, VisitType};

use crate::entities::{BloodPressureCategory, HealthRecordSummary};

/// Readings at or above this are hypertension in pregnancy
pub const HYPERTENSION_SYSTOLIC: i32 = 140;
pub const HYPERTENSION_DIASTOLIC: i32 = 90;

/// Categorize blood pressure based on measurements
pub fn categorize_blood_pressure(systolic: i32, diastolic: i32) -> BloodPressureCategory {
    if systolic >= 180 || diastolic >= 120 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= HYPERTENSION_SYSTOLIC || diastolic >= HYPERTENSION_DIASTOLIC {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::Hypertension1
    } else if systolic >= 120 && diastolic < 80 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

fn is_hypertensive(systolic: Option<i32>, diastolic: Option<i32>) -> bool {
    systolic.map_or(false, |s| s >= HYPERTENSION_SYSTOLIC) || diastolic.map_or(false, |d| d >= HYPERTENSION_DIASTOLIC)
}

/// Completed weeks between LMP and `as_of`
pub fn gestational_age_weeks(lmp: NaiveDate, as_of: NaiveDate) -> Option<i64> {
    let days = (as_of - lmp).num_days();
    if days < 0 {
        None
    } else {
        Some(days / 7)
    }
}

/// Summarize one pregnancy from its record, visits and children
///
/// `visits` may come in any order.
pub fn summarize_health_record(
    record: &HealthRecord,
    visits: &[VisitRecord],
    children: usize,
    as_of: NaiveDate,
) -> HealthRecordSummary {
    let prenatal_visits = visits.iter().filter(|v| v.visit_type == VisitType::Prenatal).count();
    let postnatal_visits = visits.len() - prenatal_visits;

    let gestational_age_weeks = match (record.pregnancy_status, record.lmp) {
        (PregnancyStatus::Pregnant, Some(lmp)) => gestational_age_weeks(lmp, as_of),
        _ => None,
    };

    // Latest visit with a full reading wins, else the record's own reading
    let latest_visit_reading = visits
        .iter()
        .filter_map(|v| match (v.systolic, v.diastolic) {
            (Some(s), Some(d)) => Some((v.visit_date, v.visit_id, s, d)),
            _ => None,
        })
        .max_by_key(|(date, id, _, _)| (*date, *id))
        .map(|(_, _, s, d)| (s, d));
    let record_reading = match (record.systolic, record.diastolic) {
        (Some(s), Some(d)) => Some((s, d)),
        _ => None,
    };
    let latest_bp_category = latest_visit_reading
        .or(record_reading)
        .map(|(s, d)| categorize_blood_pressure(s, d));

    let hypertension_flag = is_hypertensive(record.systolic, record.diastolic)
        || visits.iter().any(|v| is_hypertensive(v.systolic, v.diastolic));

    HealthRecordSummary {
        health_id: record.health_id,
        profile_id: record.profile_id,
        as_of,
        gestational_age_weeks,
        edd: crate::entities::conversions::derive_edd(record.lmp, record.edd),
        prenatal_visits,
        postnatal_visits,
        latest_bp_category,
        hypertension_flag,
        children,
    }
}
