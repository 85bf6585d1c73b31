pub mod address;
pub mod early_warning;
pub mod education;
pub mod errors;
pub mod health;
pub mod ids;
pub mod insights;
pub mod profile;
pub mod users;

// Domain services
// This module contains business logic implementations.

use std::sync::Arc;

use maternal_care_data::repository::Storage;

use crate::auth::TokenSettings;

pub use address::AddressDirectory;
pub use early_warning::{
    provider_for, EarlyWarningProvider, EarlyWarningService, EarlyWarningServiceTrait, RemoteProvider,
    RuleBasedProvider,
};
pub use education::{EducationService, EducationServiceTrait};
pub use errors::ServiceError;
pub use health::{HealthRecordService, HealthRecordServiceTrait};
pub use profile::{ProfileService, ProfileServiceTrait};
pub use users::{UserService, UserServiceTrait};

/// Every domain service, wired to one storage backend
#[derive(Clone)]
pub struct DomainServices {
    pub address: Arc<AddressDirectory>,
    pub profiles: Arc<dyn ProfileServiceTrait>,
    pub health_records: Arc<dyn HealthRecordServiceTrait>,
    pub education: Arc<dyn EducationServiceTrait>,
    pub early_warning: Arc<dyn EarlyWarningServiceTrait>,
    pub users: Arc<dyn UserServiceTrait>,
}

/// Build the default services over `storage`
pub fn create_default_services(
    storage: &Storage,
    address: Arc<AddressDirectory>,
    tokens: Arc<TokenSettings>,
    provider: Arc<dyn EarlyWarningProvider>,
) -> DomainServices {
    let repo = || Arc::new(storage.clone());

    DomainServices {
        address: address.clone(),
        profiles: Arc::new(ProfileService::new(repo(), repo(), address)),
        health_records: Arc::new(HealthRecordService::new(repo(), repo(), repo(), repo())),
        education: Arc::new(EducationService::new(repo(), repo())),
        early_warning: Arc::new(EarlyWarningService::new(repo(), repo(), repo(), provider)),
        users: Arc::new(UserService::new(repo(), tokens)),
    }
}
