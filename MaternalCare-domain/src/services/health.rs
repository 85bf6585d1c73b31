use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use maternal_care_data::models::{ChildRecord, HealthRecord, Profile, VisitRecord};
use maternal_care_data::repository::{ListQuery, Repository};

use super::errors::{validate_request, ServiceError};
use super::ids::random_id;
use super::insights::summarize_health_record;
use crate::entities::conversions;
use crate::entities::{ChildRecordRequest, HealthRecordRequest, HealthRecordSummary, VisitRecordRequest};

/// One page of a child list
pub type Page<T> = (Vec<T>, usize);

/// Trait for maternal health, child and visit records
#[async_trait]
pub trait HealthRecordServiceTrait: Send + Sync {
    async fn create_health_record(&self, profile_id: i64, request: HealthRecordRequest) -> Result<HealthRecord, ServiceError>;
    async fn update_health_record(&self, health_id: i64, request: HealthRecordRequest) -> Result<HealthRecord, ServiceError>;
    async fn get_health_record(&self, health_id: i64) -> Result<HealthRecord, ServiceError>;
    async fn list_health_records(&self, profile_id: i64, limit: Option<usize>, offset: Option<usize>) -> Result<Page<HealthRecord>, ServiceError>;

    /// Gestational age, EDD, visit counts and blood-pressure flags as of a date
    async fn summarize(&self, health_id: i64, as_of: NaiveDate) -> Result<HealthRecordSummary, ServiceError>;

    async fn create_child(&self, health_id: i64, request: ChildRecordRequest) -> Result<ChildRecord, ServiceError>;
    async fn update_child(&self, child_id: i64, request: ChildRecordRequest) -> Result<ChildRecord, ServiceError>;
    async fn get_child(&self, child_id: i64) -> Result<ChildRecord, ServiceError>;
    async fn list_children(&self, health_id: i64, limit: Option<usize>, offset: Option<usize>) -> Result<Page<ChildRecord>, ServiceError>;

    async fn create_visit(&self, health_id: i64, request: VisitRecordRequest) -> Result<VisitRecord, ServiceError>;
    async fn update_visit(&self, visit_id: i64, request: VisitRecordRequest) -> Result<VisitRecord, ServiceError>;
    async fn get_visit(&self, visit_id: i64) -> Result<VisitRecord, ServiceError>;

    /// Ordered by visit date
    async fn list_visits(&self, health_id: i64, limit: Option<usize>, offset: Option<usize>) -> Result<Page<VisitRecord>, ServiceError>;
}

/// Health record service for domain logic
pub struct HealthRecordService {
    profiles: Arc<dyn Repository<Profile>>,
    records: Arc<dyn Repository<HealthRecord>>,
    children: Arc<dyn Repository<ChildRecord>>,
    visits: Arc<dyn Repository<VisitRecord>>,
}

impl HealthRecordService {
    /// Create a new health record service
    pub fn new(
        profiles: Arc<dyn Repository<Profile>>,
        records: Arc<dyn Repository<HealthRecord>>,
        children: Arc<dyn Repository<ChildRecord>>,
        visits: Arc<dyn Repository<VisitRecord>>,
    ) -> Self {
        Self {
            profiles,
            records,
            children,
            visits,
        }
    }

    async fn ensure_profile(&self, profile_id: i64) -> Result<(), ServiceError> {
        if !self.profiles.exists(profile_id).await? {
            return Err(ServiceError::NotFound(format!("Profile with ID {} not found", profile_id)));
        }
        Ok(())
    }

    async fn ensure_health_record(&self, health_id: i64) -> Result<(), ServiceError> {
        if !self.records.exists(health_id).await? {
            return Err(ServiceError::NotFound(format!("Health record with ID {} not found", health_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthRecordServiceTrait for HealthRecordService {
    async fn create_health_record(&self, profile_id: i64, request: HealthRecordRequest) -> Result<HealthRecord, ServiceError> {
        validate_request(&request)?;
        self.ensure_profile(profile_id).await?;

        let now = Utc::now();
        let health_id = random_id(self.records.as_ref(), now.year()).await?;
        let record = conversions::convert_to_data_health_record(health_id, profile_id, &request, now, now)?;

        let stored = self.records.insert(record).await?;
        info!("Health record {} created for profile {}", stored.health_id, profile_id);
        Ok(stored)
    }

    async fn update_health_record(&self, health_id: i64, request: HealthRecordRequest) -> Result<HealthRecord, ServiceError> {
        validate_request(&request)?;
        let existing = self.get_health_record(health_id).await?;

        let record = conversions::convert_to_data_health_record(
            health_id,
            existing.profile_id,
            &request,
            existing.created_at,
            Utc::now(),
        )?;

        let stored = self.records.update(record).await?;
        info!("Health record {} updated", health_id);
        Ok(stored)
    }

    async fn get_health_record(&self, health_id: i64) -> Result<HealthRecord, ServiceError> {
        self.records
            .get(health_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Health record with ID {} not found", health_id)))
    }

    async fn list_health_records(&self, profile_id: i64, limit: Option<usize>, offset: Option<usize>) -> Result<Page<HealthRecord>, ServiceError> {
        self.ensure_profile(profile_id).await?;
        let query = ListQuery {
            limit,
            offset,
            ..ListQuery::children_of(profile_id)
        };
        Ok(self.records.list(query).await?)
    }

    async fn summarize(&self, health_id: i64, as_of: NaiveDate) -> Result<HealthRecordSummary, ServiceError> {
        let record = self.get_health_record(health_id).await?;
        let (visits, _) = self.visits.list(ListQuery::children_of(health_id)).await?;
        let (_, children) = self
            .children
            .list(ListQuery {
                limit: Some(0),
                ..ListQuery::children_of(health_id)
            })
            .await?;

        Ok(summarize_health_record(&record, &visits, children, as_of))
    }

    async fn create_child(&self, health_id: i64, request: ChildRecordRequest) -> Result<ChildRecord, ServiceError> {
        validate_request(&request)?;
        self.ensure_health_record(health_id).await?;

        let now = Utc::now();
        let child_id = random_id(self.children.as_ref(), now.year()).await?;
        let child = conversions::convert_to_data_child(child_id, health_id, &request, now, now)?;

        let stored = self.children.insert(child).await?;
        info!("Child record {} created under health record {}", stored.child_id, health_id);
        Ok(stored)
    }

    async fn update_child(&self, child_id: i64, request: ChildRecordRequest) -> Result<ChildRecord, ServiceError> {
        validate_request(&request)?;
        let existing = self.get_child(child_id).await?;

        let child = conversions::convert_to_data_child(
            child_id,
            existing.health_id,
            &request,
            existing.created_at,
            Utc::now(),
        )?;

        let stored = self.children.update(child).await?;
        info!("Child record {} updated", child_id);
        Ok(stored)
    }

    async fn get_child(&self, child_id: i64) -> Result<ChildRecord, ServiceError> {
        self.children
            .get(child_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Child record with ID {} not found", child_id)))
    }

    async fn list_children(&self, health_id: i64, limit: Option<usize>, offset: Option<usize>) -> Result<Page<ChildRecord>, ServiceError> {
        self.ensure_health_record(health_id).await?;
        let query = ListQuery {
            limit,
            offset,
            ..ListQuery::children_of(health_id)
        };
        Ok(self.children.list(query).await?)
    }

    async fn create_visit(&self, health_id: i64, request: VisitRecordRequest) -> Result<VisitRecord, ServiceError> {
        validate_request(&request)?;
        self.ensure_health_record(health_id).await?;

        let now = Utc::now();
        let visit_id = random_id(self.visits.as_ref(), now.year()).await?;
        let visit = conversions::convert_to_data_visit(visit_id, health_id, &request, now, now)?;

        let stored = self.visits.insert(visit).await?;
        info!("Visit {} recorded under health record {}", stored.visit_id, health_id);
        Ok(stored)
    }

    async fn update_visit(&self, visit_id: i64, request: VisitRecordRequest) -> Result<VisitRecord, ServiceError> {
        validate_request(&request)?;
        let existing = self.get_visit(visit_id).await?;

        let visit = conversions::convert_to_data_visit(
            visit_id,
            existing.health_id,
            &request,
            existing.created_at,
            Utc::now(),
        )?;

        let stored = self.visits.update(visit).await?;
        info!("Visit {} updated", visit_id);
        Ok(stored)
    }

    async fn get_visit(&self, visit_id: i64) -> Result<VisitRecord, ServiceError> {
        self.visits
            .get(visit_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Visit with ID {} not found", visit_id)))
    }

    async fn list_visits(&self, health_id: i64, limit: Option<usize>, offset: Option<usize>) -> Result<Page<VisitRecord>, ServiceError> {
        self.ensure_health_record(health_id).await?;
        let query = ListQuery {
            limit,
            offset,
            ..ListQuery::children_of(health_id)
        };
        Ok(self.visits.list(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::profile::tests::{profile_request, service as profile_service};
    use crate::services::profile::ProfileServiceTrait;
    use maternal_care_data::models::{Sex, VisitType};
    use maternal_care_data::repository::Storage;

    fn health_request() -> HealthRecordRequest {
        let lmp = Utc::now().date_naive() - chrono::Duration::days(70);
        HealthRecordRequest {
            lmp: Some(lmp),
            edd: None,
            gravida: 1,
            parity: 0,
            height_cm: Some(150.0),
            weight_kg: Some(47.0),
            systolic: Some(112),
            diastolic: Some(72),
            td_doses: 1,
            td_last_dose: Some(lmp),
            pregnancy_status: None,
            remarks: None,
        }
    }

    fn visit_request(days_ago: i64, systolic: i32, diastolic: i32) -> VisitRecordRequest {
        VisitRecordRequest {
            visit_type: VisitType::Prenatal,
            visit_date: Utc::now().date_naive() - chrono::Duration::days(days_ago),
            weight_kg: Some(48.0),
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            fundal_height_cm: None,
            fetal_heart_rate: Some(150),
            attended_by: Some("Midwife Reyes".to_string()),
            remarks: None,
        }
    }

    fn service(storage: &Storage) -> HealthRecordService {
        HealthRecordService::new(
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
        )
    }

    #[tokio::test]
    async fn test_health_record_requires_profile() {
        let service = service(&Storage::memory());
        let result = service.create_health_record(20240001, health_request()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_health_record_ids_stay_in_current_year() {
        let storage = Storage::memory();
        let profile = profile_service(&storage)
            .create_profile(profile_request("Maria"))
            .await
            .unwrap();
        let service = service(&storage);

        let record = service
            .create_health_record(profile.profile_id, health_request())
            .await
            .unwrap();

        let year = i64::from(Utc::now().year());
        assert_eq!(record.health_id / 10000, year);
        assert!(record.edd.is_some());
    }

    #[tokio::test]
    async fn test_summary_counts_visits_and_flags_hypertension() {
        let storage = Storage::memory();
        let profile = profile_service(&storage)
            .create_profile(profile_request("Maria"))
            .await
            .unwrap();
        let service = service(&storage);
        let record = service
            .create_health_record(profile.profile_id, health_request())
            .await
            .unwrap();

        service.create_visit(record.health_id, visit_request(30, 118, 76)).await.unwrap();
        service.create_visit(record.health_id, visit_request(2, 145, 92)).await.unwrap();

        let summary = service
            .summarize(record.health_id, Utc::now().date_naive())
            .await
            .unwrap();

        assert_eq!(summary.prenatal_visits, 2);
        assert_eq!(summary.gestational_age_weeks, Some(10));
        assert!(summary.hypertension_flag);
        assert_eq!(summary.children, 0);
    }

    #[tokio::test]
    async fn test_visits_listed_by_date() {
        let storage = Storage::memory();
        let profile = profile_service(&storage)
            .create_profile(profile_request("Maria"))
            .await
            .unwrap();
        let service = service(&storage);
        let record = service
            .create_health_record(profile.profile_id, health_request())
            .await
            .unwrap();

        service.create_visit(record.health_id, visit_request(3, 110, 70)).await.unwrap();
        service.create_visit(record.health_id, visit_request(40, 112, 72)).await.unwrap();

        let (visits, total) = service.list_visits(record.health_id, None, None).await.unwrap();
        assert_eq!(total, 2);
        assert!(visits[0].visit_date < visits[1].visit_date);
    }

    #[tokio::test]
    async fn test_child_immunizations_are_normalized() {
        let storage = Storage::memory();
        let profile = profile_service(&storage)
            .create_profile(profile_request("Maria"))
            .await
            .unwrap();
        let service = service(&storage);
        let record = service
            .create_health_record(profile.profile_id, health_request())
            .await
            .unwrap();

        let request = ChildRecordRequest {
            first_name: "Lea".to_string(),
            last_name: "Santos".to_string(),
            sex: Sex::Female,
            birth_date: Utc::now().date_naive(),
            birth_weight_kg: Some(2.9),
            birth_length_cm: Some(49.0),
            place_of_delivery: Some("Rural Health Unit".to_string()),
            immunizations: vec!["bcg".to_string(), "hepb".to_string(), "BCG".to_string()],
        };
        let child = service.create_child(record.health_id, request).await.unwrap();

        assert_eq!(child.immunizations, vec!["BCG", "HEPB"]);
        let fetched = service.get_child(child.child_id).await.unwrap();
        assert_eq!(fetched.health_id, record.health_id);
    }

    fn child_request(immunizations: &[&str]) -> ChildRecordRequest {
        ChildRecordRequest {
            first_name: "Lea".to_string(),
            last_name: "Santos".to_string(),
            sex: Sex::Female,
            birth_date: Utc::now().date_naive() - chrono::Duration::days(10),
            birth_weight_kg: Some(2.9),
            birth_length_cm: Some(49.0),
            place_of_delivery: Some("Rural Health Unit".to_string()),
            immunizations: immunizations.iter().map(|code| code.to_string()).collect(),
        }
    }

    async fn record_for_new_profile(storage: &Storage) -> HealthRecord {
        let profile = profile_service(storage)
            .create_profile(profile_request("Maria"))
            .await
            .unwrap();
        service(storage)
            .create_health_record(profile.profile_id, health_request())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_record_update_rederives_edd() {
        let storage = Storage::memory();
        let record = record_for_new_profile(&storage).await;
        let service = service(&storage);

        let new_lmp = Utc::now().date_naive() - chrono::Duration::days(50);
        let mut request = health_request();
        request.lmp = Some(new_lmp);
        request.gravida = 2;
        request.parity = 1;

        let updated = service.update_health_record(record.health_id, request).await.unwrap();

        assert_eq!(updated.health_id, record.health_id);
        assert_eq!(updated.profile_id, record.profile_id);
        assert_eq!(updated.created_at, record.created_at);
        assert!(updated.updated_at >= record.updated_at);
        assert_eq!(updated.lmp, Some(new_lmp));
        assert_eq!(updated.edd, Some(new_lmp + chrono::Duration::days(280)));
        assert_ne!(updated.edd, record.edd);

        let fetched = service.get_health_record(record.health_id).await.unwrap();
        assert_eq!(fetched.gravida, 2);
        assert_eq!(fetched.edd, updated.edd);
    }

    #[tokio::test]
    async fn test_update_of_missing_records_is_not_found() {
        let storage = Storage::memory();
        let service = service(&storage);

        let result = service.update_health_record(20240001, health_request()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        let result = service.update_child(20240001, child_request(&["BCG"])).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        let result = service.update_visit(20240001, visit_request(5, 110, 70)).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_child_update_renormalizes_immunizations() {
        let storage = Storage::memory();
        let record = record_for_new_profile(&storage).await;
        let service = service(&storage);
        let child = service
            .create_child(record.health_id, child_request(&["BCG"]))
            .await
            .unwrap();

        let mut request = child_request(&["opv1", " hepb ", "bcg", "OPV1"]);
        request.first_name = "Leah".to_string();
        let updated = service.update_child(child.child_id, request).await.unwrap();

        assert_eq!(updated.immunizations, vec!["OPV1", "HEPB", "BCG"]);
        assert_eq!(updated.first_name, "Leah");
        assert_eq!(updated.health_id, record.health_id);
        assert_eq!(updated.created_at, child.created_at);
    }

    #[tokio::test]
    async fn test_visit_update_keeps_parent_and_created_at() {
        let storage = Storage::memory();
        let record = record_for_new_profile(&storage).await;
        let service = service(&storage);
        let visit = service
            .create_visit(record.health_id, visit_request(20, 118, 76))
            .await
            .unwrap();

        let updated = service
            .update_visit(visit.visit_id, visit_request(14, 120, 80))
            .await
            .unwrap();

        assert_eq!(updated.visit_id, visit.visit_id);
        assert_eq!(updated.health_id, record.health_id);
        assert_eq!(updated.created_at, visit.created_at);
        assert_eq!(updated.visit_date, Utc::now().date_naive() - chrono::Duration::days(14));
        assert_eq!(updated.systolic, Some(120));

        let (visits, total) = service.list_visits(record.health_id, None, None).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(visits[0].visit_date, updated.visit_date);
    }
}
