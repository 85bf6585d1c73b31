use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use maternal_care_data::models::{Address, Partner, Profile};
use maternal_care_data::repository::{ListQuery, Repository};

use super::address::{copy_address, AddressDirectory};
use super::errors::{validate_request, ServiceError};
use super::ids::next_sequential_id;
use crate::entities::conversions::{self, normalize_address};
use crate::entities::{PartnerRequest, ProfileRequest};

/// Trait for profile and partner operations
#[async_trait]
pub trait ProfileServiceTrait: Send + Sync {
    /// Register a new profile under the next sequential identifier of the year
    async fn create_profile(&self, request: ProfileRequest) -> Result<Profile, ServiceError>;

    /// Replace a profile's fields, optionally taking the partner's address
    async fn update_profile(&self, profile_id: i64, request: ProfileRequest) -> Result<Profile, ServiceError>;

    async fn get_profile(&self, profile_id: i64) -> Result<Profile, ServiceError>;

    /// Newest first, optionally filtered by a name fragment
    async fn list_profiles(
        &self,
        search: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<(Vec<Profile>, usize), ServiceError>;

    /// Create the partner record when absent, otherwise update it
    async fn upsert_partner(&self, profile_id: i64, request: PartnerRequest) -> Result<Partner, ServiceError>;

    async fn get_partner(&self, profile_id: i64) -> Result<Partner, ServiceError>;
}

/// Profile service for domain logic
pub struct ProfileService {
    profiles: Arc<dyn Repository<Profile>>,
    partners: Arc<dyn Repository<Partner>>,
    address: Arc<AddressDirectory>,
}

impl ProfileService {
    /// Create a new profile service
    pub fn new(
        profiles: Arc<dyn Repository<Profile>>,
        partners: Arc<dyn Repository<Partner>>,
        address: Arc<AddressDirectory>,
    ) -> Self {
        Self {
            profiles,
            partners,
            address,
        }
    }

    async fn find_partner(&self, profile_id: i64) -> Result<Option<Partner>, ServiceError> {
        Ok(self.partners.get(profile_id).await?)
    }

    /// Normalized request address, checked against the reference data
    fn checked_address(&self, address: &Address) -> Result<Address, ServiceError> {
        let address = normalize_address(address);
        self.address.validate(&address)?;
        Ok(address)
    }
}

#[async_trait]
impl ProfileServiceTrait for ProfileService {
    async fn create_profile(&self, request: ProfileRequest) -> Result<Profile, ServiceError> {
        validate_request(&request)?;
        if request.copy_address_from_partner {
            return Err(ServiceError::Validation(
                "A new profile has no partner to copy the address from".to_string(),
            ));
        }
        let address = self.checked_address(&request.address)?;

        let now = Utc::now();
        let profile_id = next_sequential_id(self.profiles.as_ref(), now.year()).await?;
        let profile = conversions::convert_to_data_profile(profile_id, &request, address, now, now)?;

        let stored = self.profiles.insert(profile).await?;
        info!("Profile created with ID: {}", stored.profile_id);
        Ok(stored)
    }

    async fn update_profile(&self, profile_id: i64, request: ProfileRequest) -> Result<Profile, ServiceError> {
        validate_request(&request)?;
        let existing = self.get_profile(profile_id).await?;

        let address = if request.copy_address_from_partner {
            let partner = self.find_partner(profile_id).await?.ok_or_else(|| {
                ServiceError::Validation(format!("Profile {} has no partner to copy the address from", profile_id))
            })?;
            debug!("Copying partner address onto profile {}", profile_id);
            copy_address(&partner.address)
        } else {
            self.checked_address(&request.address)?
        };

        let profile =
            conversions::convert_to_data_profile(profile_id, &request, address, existing.created_at, Utc::now())?;

        let stored = self.profiles.update(profile).await?;
        info!("Profile {} updated", profile_id);
        Ok(stored)
    }

    async fn get_profile(&self, profile_id: i64) -> Result<Profile, ServiceError> {
        self.profiles
            .get(profile_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Profile with ID {} not found", profile_id)))
    }

    async fn list_profiles(
        &self,
        search: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<(Vec<Profile>, usize), ServiceError> {
        let query = ListQuery {
            parent: None,
            search: conversions::optional_text(search.as_deref()),
            limit,
            offset,
        };
        Ok(self.profiles.list(query).await?)
    }

    async fn upsert_partner(&self, profile_id: i64, request: PartnerRequest) -> Result<Partner, ServiceError> {
        validate_request(&request)?;
        let profile = self.get_profile(profile_id).await?;

        let address = if request.copy_address_from_profile {
            debug!("Copying profile address onto partner {}", profile_id);
            copy_address(&profile.address)
        } else {
            self.checked_address(&request.address)?
        };

        let now = Utc::now();
        match self.find_partner(profile_id).await? {
            Some(existing) => {
                let partner =
                    conversions::convert_to_data_partner(profile_id, &request, address, existing.created_at, now)?;
                let stored = self.partners.update(partner).await?;
                info!("Partner for profile {} updated", profile_id);
                Ok(stored)
            }
            None => {
                let partner = conversions::convert_to_data_partner(profile_id, &request, address, now, now)?;
                let stored = self.partners.insert(partner).await?;
                info!("Partner for profile {} created", profile_id);
                Ok(stored)
            }
        }
    }

    async fn get_partner(&self, profile_id: i64) -> Result<Partner, ServiceError> {
        self.get_profile(profile_id).await?;
        self.find_partner(profile_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Profile {} has no partner record", profile_id)))
    }
}
