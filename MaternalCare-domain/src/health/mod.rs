//! Domain layer health check functionality

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;
use utoipa::ToSchema;

use maternal_care_data::repository::Storage;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    /// Working, with reduced guarantees (e.g. records are not persisted)
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Health checks against the configured storage
#[derive(Debug, Clone)]
pub struct StorageHealthService {
    storage: Storage,
}

impl StorageHealthService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    async fn check_storage(&self) -> HealthComponent {
        match self.storage.ping().await {
            Ok(()) if self.storage.is_persistent() => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(self.storage.describe()),
            },
            Ok(()) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some(format!("{}; records are lost on restart", self.storage.describe())),
            },
            Err(e) => {
                warn!("Storage health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e.to_string()),
                }
            }
        }
    }
}

#[async_trait]
impl HealthServiceTrait for StorageHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = self.check_storage().await;

        let overall_status = match db_component.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };

        SystemHealth {
            status: overall_status,
            components: vec![("database".to_string(), db_component)].into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_is_degraded() {
        let service = StorageHealthService::new(Storage::memory());
        let health = service.get_system_health().await;

        assert_eq!(health.status, SystemStatus::Degraded);
        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Degraded);
        assert!(database.details.as_deref().unwrap_or("").contains("in-memory"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SystemStatus::Healthy).unwrap(), "\"healthy\"");
    }
}
