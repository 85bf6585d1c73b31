use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::info;

use maternal_care_data::models::{EducationRecord, Profile};
use maternal_care_data::repository::{ListQuery, Repository};

use super::errors::{validate_request, ServiceError};
use super::ids::random_id;
use crate::entities::conversions::convert_to_data_education;
use crate::entities::EducationRequest;

/// Trait for education and training enrollments
#[async_trait]
pub trait EducationServiceTrait: Send + Sync {
    async fn create_education(&self, profile_id: i64, request: EducationRequest) -> Result<EducationRecord, ServiceError>;
    async fn update_education(&self, education_id: i64, request: EducationRequest) -> Result<EducationRecord, ServiceError>;
    async fn get_education(&self, education_id: i64) -> Result<EducationRecord, ServiceError>;

    /// Most recent enrollment first
    async fn list_education(
        &self,
        profile_id: i64,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<(Vec<EducationRecord>, usize), ServiceError>;
}

pub struct EducationService {
    profiles: Arc<dyn Repository<Profile>>,
    records: Arc<dyn Repository<EducationRecord>>,
}

impl EducationService {
    pub fn new(profiles: Arc<dyn Repository<Profile>>, records: Arc<dyn Repository<EducationRecord>>) -> Self {
        Self { profiles, records }
    }

    async fn ensure_profile(&self, profile_id: i64) -> Result<(), ServiceError> {
        if !self.profiles.exists(profile_id).await? {
            return Err(ServiceError::NotFound(format!("Profile with ID {} not found", profile_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl EducationServiceTrait for EducationService {
    async fn create_education(&self, profile_id: i64, request: EducationRequest) -> Result<EducationRecord, ServiceError> {
        validate_request(&request)?;
        self.ensure_profile(profile_id).await?;

        let now = Utc::now();
        let education_id = random_id(self.records.as_ref(), now.year()).await?;
        let record = convert_to_data_education(education_id, profile_id, &request, now, now)?;

        let stored = self.records.insert(record).await?;
        info!(
            "Education record {} ({}) created for profile {}",
            stored.education_id, stored.program_type, profile_id
        );
        Ok(stored)
    }

    async fn update_education(&self, education_id: i64, request: EducationRequest) -> Result<EducationRecord, ServiceError> {
        validate_request(&request)?;
        let existing = self.get_education(education_id).await?;

        let record = convert_to_data_education(
            education_id,
            existing.profile_id,
            &request,
            existing.created_at,
            Utc::now(),
        )?;

        let stored = self.records.update(record).await?;
        info!("Education record {} updated", education_id);
        Ok(stored)
    }

    async fn get_education(&self, education_id: i64) -> Result<EducationRecord, ServiceError> {
        self.records
            .get(education_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Education record with ID {} not found", education_id)))
    }

    async fn list_education(
        &self,
        profile_id: i64,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<(Vec<EducationRecord>, usize), ServiceError> {
        self.ensure_profile(profile_id).await?;
        let query = ListQuery {
            limit,
            offset,
            ..ListQuery::children_of(profile_id)
        };
        Ok(self.records.list(query).await?)
    }
}
