//! Payload shaping: request entities in, storage rows out
//!
//! Every function here trims text, turns blank optional text into `None` and
//! checks the cross-field rules `validator` cannot express. Timestamps are
//! passed in so callers decide what "now" is.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use std::collections::HashSet;

use maternal_care_data::models::{
    Address, ChildRecord, EducationRecord, HealthRecord, Partner, PregnancyStatus, Profile, VisitRecord,
};

use crate::entities::{
    ChildRecordRequest, EducationRequest, HealthRecordRequest, PartnerRequest, ProfileRequest, VisitRecordRequest,
};
use crate::services::errors::ServiceError;

/// Days from LMP to the expected date of delivery (Naegele's rule)
pub const PREGNANCY_DAYS: i64 = 280;

/// Vaccine codes accepted on child records
pub const IMMUNIZATION_CODES: &[&str] = &[
    "BCG", "HEPB", "PENTA1", "PENTA2", "PENTA3", "OPV1", "OPV2", "OPV3", "IPV", "PCV1", "PCV2", "PCV3",
    "MCV1", "MCV2",
];

static KNOWN_IMMUNIZATIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| IMMUNIZATION_CODES.iter().copied().collect());

/// Whole years between `birth_date` and `today`
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Trimmed value, or a validation error naming the field when blank
pub fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value, `None` when missing or blank
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn not_in_future(field: &str, date: NaiveDate, today: NaiveDate) -> Result<(), ServiceError> {
    if date > today {
        return Err(ServiceError::Validation(format!("{} cannot be in the future", field)));
    }
    Ok(())
}

/// Trim every code and the street line
pub fn normalize_address(address: &Address) -> Address {
    Address {
        region_code: address.region_code.trim().to_string(),
        province_code: address.province_code.trim().to_string(),
        municipality_code: address.municipality_code.trim().to_string(),
        barangay_code: address.barangay_code.trim().to_string(),
        street: optional_text(address.street.as_deref()),
    }
}

/// Upper-case, de-duplicate and check vaccine codes, keeping first-seen order
pub fn normalize_immunizations(codes: &[String]) -> Result<Vec<String>, ServiceError> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(codes.len());

    for code in codes {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            continue;
        }
        if !KNOWN_IMMUNIZATIONS.contains(code.as_str()) {
            return Err(ServiceError::Validation(format!("Unknown immunization code: {}", code)));
        }
        if seen.insert(code.clone()) {
            normalized.push(code);
        }
    }

    Ok(normalized)
}

/// Stored EDD, else LMP + 280 days
pub fn derive_edd(lmp: Option<NaiveDate>, edd: Option<NaiveDate>) -> Option<NaiveDate> {
    edd.or_else(|| lmp.map(|lmp| lmp + Duration::days(PREGNANCY_DAYS)))
}

/// Convert from a profile request to the stored row
///
/// `created_at` is kept from the existing row on updates.
pub fn convert_to_data_profile(
    profile_id: i64,
    request: &ProfileRequest,
    address: Address,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Profile, ServiceError> {
    let today = now.date_naive();
    not_in_future("Birth date", request.birth_date, today)?;

    Ok(Profile {
        profile_id,
        first_name: required("First name", &request.first_name)?,
        middle_name: optional_text(request.middle_name.as_deref()),
        last_name: required("Last name", &request.last_name)?,
        suffix: optional_text(request.suffix.as_deref()),
        birth_date: request.birth_date,
        age: age_on(request.birth_date, today),
        civil_status: required("Civil status", &request.civil_status)?,
        religion: optional_text(request.religion.as_deref()),
        contact_number: optional_text(request.contact_number.as_deref()),
        educational_attainment: required("Educational attainment", &request.educational_attainment)?,
        occupation: optional_text(request.occupation.as_deref()),
        address,
        created_at,
        updated_at: now,
    })
}

/// Convert from a partner request to the stored row
pub fn convert_to_data_partner(
    profile_id: i64,
    request: &PartnerRequest,
    address: Address,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Partner, ServiceError> {
    let today = now.date_naive();
    not_in_future("Birth date", request.birth_date, today)?;

    Ok(Partner {
        profile_id,
        first_name: required("First name", &request.first_name)?,
        middle_name: optional_text(request.middle_name.as_deref()),
        last_name: required("Last name", &request.last_name)?,
        suffix: optional_text(request.suffix.as_deref()),
        birth_date: request.birth_date,
        age: age_on(request.birth_date, today),
        civil_status: required("Civil status", &request.civil_status)?,
        occupation: optional_text(request.occupation.as_deref()),
        contact_number: optional_text(request.contact_number.as_deref()),
        educational_attainment: required("Educational attainment", &request.educational_attainment)?,
        address,
        created_at,
        updated_at: now,
    })
}

/// Convert from a health record request to the stored row
pub fn convert_to_data_health_record(
    health_id: i64,
    profile_id: i64,
    request: &HealthRecordRequest,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<HealthRecord, ServiceError> {
    let today = now.date_naive();

    if request.parity > request.gravida {
        return Err(ServiceError::Validation("Parity cannot exceed gravida".to_string()));
    }
    if let (Some(systolic), Some(diastolic)) = (request.systolic, request.diastolic) {
        if systolic <= diastolic {
            return Err(ServiceError::Validation(
                "Systolic pressure must be greater than diastolic pressure".to_string(),
            ));
        }
    }
    if let Some(lmp) = request.lmp {
        not_in_future("LMP", lmp, today)?;
    }
    if let (Some(lmp), Some(edd)) = (request.lmp, request.edd) {
        if edd <= lmp {
            return Err(ServiceError::Validation("EDD must be after LMP".to_string()));
        }
    }
    if let Some(td_last_dose) = request.td_last_dose {
        not_in_future("Last Td dose", td_last_dose, today)?;
        if request.td_doses == 0 {
            return Err(ServiceError::Validation(
                "Last Td dose given but no Td doses recorded".to_string(),
            ));
        }
    }

    Ok(HealthRecord {
        health_id,
        profile_id,
        lmp: request.lmp,
        edd: derive_edd(request.lmp, request.edd),
        gravida: request.gravida,
        parity: request.parity,
        height_cm: request.height_cm,
        weight_kg: request.weight_kg,
        systolic: request.systolic,
        diastolic: request.diastolic,
        td_doses: request.td_doses,
        td_last_dose: request.td_last_dose,
        pregnancy_status: request.pregnancy_status.unwrap_or(PregnancyStatus::Pregnant),
        remarks: optional_text(request.remarks.as_deref()),
        created_at,
        updated_at: now,
    })
}

/// Convert from a child record request to the stored row
pub fn convert_to_data_child(
    child_id: i64,
    health_id: i64,
    request: &ChildRecordRequest,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ChildRecord, ServiceError> {
    not_in_future("Birth date", request.birth_date, now.date_naive())?;

    Ok(ChildRecord {
        child_id,
        health_id,
        first_name: required("First name", &request.first_name)?,
        last_name: required("Last name", &request.last_name)?,
        sex: request.sex,
        birth_date: request.birth_date,
        birth_weight_kg: request.birth_weight_kg,
        birth_length_cm: request.birth_length_cm,
        place_of_delivery: optional_text(request.place_of_delivery.as_deref()),
        immunizations: normalize_immunizations(&request.immunizations)?,
        created_at,
        updated_at: now,
    })
}

/// Convert from a visit request to the stored row
pub fn convert_to_data_visit(
    visit_id: i64,
    health_id: i64,
    request: &VisitRecordRequest,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<VisitRecord, ServiceError> {
    not_in_future("Visit date", request.visit_date, now.date_naive())?;
    if let (Some(systolic), Some(diastolic)) = (request.systolic, request.diastolic) {
        if systolic <= diastolic {
            return Err(ServiceError::Validation(
                "Systolic pressure must be greater than diastolic pressure".to_string(),
            ));
        }
    }

    Ok(VisitRecord {
        visit_id,
        health_id,
        visit_type: request.visit_type,
        visit_date: request.visit_date,
        weight_kg: request.weight_kg,
        systolic: request.systolic,
        diastolic: request.diastolic,
        fundal_height_cm: request.fundal_height_cm,
        fetal_heart_rate: request.fetal_heart_rate,
        attended_by: optional_text(request.attended_by.as_deref()),
        remarks: optional_text(request.remarks.as_deref()),
        created_at,
        updated_at: now,
    })
}

/// Convert from an education request to the stored row
pub fn convert_to_data_education(
    education_id: i64,
    profile_id: i64,
    request: &EducationRequest,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<EducationRecord, ServiceError> {
    if let Some(end_date) = request.end_date {
        if end_date < request.start_date {
            return Err(ServiceError::Validation("End date cannot be before start date".to_string()));
        }
    }

    Ok(EducationRecord {
        education_id,
        profile_id,
        program_type: request.program_type,
        institution: required("Institution", &request.institution)?,
        level_or_course: required("Level or course", &request.level_or_course)?,
        enrollment_status: request.enrollment_status,
        start_date: request.start_date,
        end_date: request.end_date,
        remarks: optional_text(request.remarks.as_deref()),
        created_at,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_counts_whole_years() {
        assert_eq!(age_on(date(2008, 5, 20), date(2024, 5, 19)), 15);
        assert_eq!(age_on(date(2008, 5, 20), date(2024, 5, 20)), 16);
        assert_eq!(age_on(date(2008, 2, 29), date(2024, 2, 28)), 15);
    }

    #[test]
    fn test_edd_derived_from_lmp() {
        assert_eq!(derive_edd(Some(date(2024, 1, 1)), None), Some(date(2024, 10, 7)));
        assert_eq!(derive_edd(Some(date(2024, 1, 1)), Some(date(2024, 10, 1))), Some(date(2024, 10, 1)));
        assert_eq!(derive_edd(None, None), None);
    }

    #[test]
    fn test_immunizations_are_upper_cased_and_deduplicated() {
        let codes = vec!["bcg".to_string(), " HepB ".to_string(), "BCG".to_string(), "".to_string()];
        assert_eq!(normalize_immunizations(&codes).unwrap(), vec!["BCG", "HEPB"]);
    }

    #[test]
    fn test_unknown_immunization_is_rejected() {
        let codes = vec!["BCG".to_string(), "ROTA1".to_string()];
        let err = normalize_immunizations(&codes).unwrap_err();
        assert!(err.to_string().contains("ROTA1"));
    }

    #[test]
    fn test_blank_required_text_is_rejected() {
        assert!(required("First name", "   ").is_err());
        assert_eq!(required("First name", "  Maria ").unwrap(), "Maria");
        assert_eq!(optional_text(Some("  ")), None);
    }

    #[test]
    fn test_health_record_parity_cannot_exceed_gravida() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let request = HealthRecordRequest {
            lmp: Some(date(2024, 3, 1)),
            edd: None,
            gravida: 1,
            parity: 2,
            height_cm: None,
            weight_kg: None,
            systolic: None,
            diastolic: None,
            td_doses: 0,
            td_last_dose: None,
            pregnancy_status: None,
            remarks: None,
        };

        let result = convert_to_data_health_record(20240001, 20240001, &request, now, now);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_health_record_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let request = HealthRecordRequest {
            lmp: Some(date(2024, 3, 1)),
            edd: None,
            gravida: 1,
            parity: 0,
            height_cm: Some(152.0),
            weight_kg: Some(48.5),
            systolic: Some(110),
            diastolic: Some(70),
            td_doses: 1,
            td_last_dose: Some(date(2024, 4, 2)),
            pregnancy_status: None,
            remarks: Some(" ".to_string()),
        };

        let record = convert_to_data_health_record(20245123, 20240001, &request, now, now).unwrap();
        assert_eq!(record.pregnancy_status, PregnancyStatus::Pregnant);
        assert_eq!(record.edd, Some(date(2024, 12, 6)));
        assert_eq!(record.remarks, None);
    }
}
