pub mod handlers;
pub mod routes;

use std::sync::Arc;

use maternal_care_domain::auth::TokenSettings;
use maternal_care_domain::health::{HealthServiceTrait, StorageHealthService};
use maternal_care_domain::repository::Storage;
use maternal_care_domain::services::{create_default_services, AddressDirectory, DomainServices, EarlyWarningProvider};

pub use routes::create_app;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub services: DomainServices,
    pub health: Arc<dyn HealthServiceTrait>,
    pub tokens: Arc<TokenSettings>,
}

impl AppState {
    pub fn new(
        storage: Storage,
        address: Arc<AddressDirectory>,
        tokens: Arc<TokenSettings>,
        provider: Arc<dyn EarlyWarningProvider>,
    ) -> Self {
        let services = create_default_services(&storage, address, tokens.clone(), provider);
        Self {
            services,
            health: Arc::new(StorageHealthService::new(storage)),
            tokens,
        }
    }
}
