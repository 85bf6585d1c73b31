//! Repeated-pregnancy and school-dropout early warnings
//!
//! Facts about a profile are always gathered locally. The verdict comes from
//! an `EarlyWarningProvider`: the built-in rules, or a remote service that
//! falls back to the rules whenever it cannot be reached or answers badly.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use maternal_care_data::models::{EducationRecord, EnrollmentStatus, HealthRecord, Profile};
use maternal_care_data::repository::{ListQuery, Repository};

use super::errors::ServiceError;
use crate::entities::conversions::age_on;
use crate::entities::{EarlyWarning, EarlyWarningFacts};

/// Ages below this with no enrollment on file count as a dropout risk
pub const SCHOOL_AGE_LIMIT: i32 = 20;

/// Source of early-warning verdicts
#[async_trait]
pub trait EarlyWarningProvider: Send + Sync {
    async fn evaluate(&self, facts: &EarlyWarningFacts) -> Result<EarlyWarning, ServiceError>;
}

/// Local rules
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedProvider;

impl RuleBasedProvider {
    pub fn assess(&self, facts: &EarlyWarningFacts) -> EarlyWarning {
        let mut reasons = Vec::new();

        let mut repeated_pregnancy = false;
        if facts.health_record_count >= 2 {
            repeated_pregnancy = true;
            reasons.push(format!("{} pregnancies on record", facts.health_record_count));
        }
        if let Some(gravida) = facts.max_gravida.filter(|g| *g >= 2) {
            repeated_pregnancy = true;
            reasons.push(format!("gravida {}", gravida));
        }

        let dropout_risk = match facts.latest_enrollment_status {
            Some(EnrollmentStatus::DroppedOut) => {
                reasons.push("latest enrollment ended in dropping out".to_string());
                true
            }
            None if facts.age < SCHOOL_AGE_LIMIT => {
                reasons.push(format!("no enrollment on file at age {}", facts.age));
                true
            }
            _ => false,
        };

        EarlyWarning {
            profile_id: facts.profile_id,
            repeated_pregnancy,
            dropout_risk,
            reasons,
            source: "rules".to_string(),
        }
    }
}

#[async_trait]
impl EarlyWarningProvider for RuleBasedProvider {
    async fn evaluate(&self, facts: &EarlyWarningFacts) -> Result<EarlyWarning, ServiceError> {
        Ok(self.assess(facts))
    }
}

/// Body expected back from the remote service
#[derive(Debug, Deserialize)]
struct RemoteVerdict {
    repeated_pregnancy: bool,
    dropout_risk: bool,
    #[serde(default)]
    reasons: Vec<String>,
}

/// Posts the facts as JSON to an external service
pub struct RemoteProvider {
    client: reqwest::Client,
    url: String,
    fallback: RuleBasedProvider,
}

impl RemoteProvider {
    pub const TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Internal(format!("early-warning client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            fallback: RuleBasedProvider,
        })
    }

    async fn call(&self, facts: &EarlyWarningFacts) -> Result<RemoteVerdict, reqwest::Error> {
        self.client
            .post(&self.url)
            .json(facts)
            .send()
            .await?
            .error_for_status()?
            .json::<RemoteVerdict>()
            .await
    }
}

#[async_trait]
impl EarlyWarningProvider for RemoteProvider {
    async fn evaluate(&self, facts: &EarlyWarningFacts) -> Result<EarlyWarning, ServiceError> {
        match self.call(facts).await {
            Ok(verdict) => {
                debug!("Remote early warning for profile {}: {:?}", facts.profile_id, verdict);
                Ok(EarlyWarning {
                    profile_id: facts.profile_id,
                    repeated_pregnancy: verdict.repeated_pregnancy,
                    dropout_risk: verdict.dropout_risk,
                    reasons: verdict.reasons,
                    source: "remote".to_string(),
                })
            }
            Err(e) => {
                warn!(
                    "Early-warning service at {} failed for profile {}, using local rules: {}",
                    self.url, facts.profile_id, e
                );
                self.fallback.evaluate(facts).await
            }
        }
    }
}

/// Provider for the configured early-warning endpoint, if any
pub fn provider_for(url: Option<&str>) -> Result<Arc<dyn EarlyWarningProvider>, ServiceError> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            info!("Early warnings delegated to {}", url);
            Ok(Arc::new(RemoteProvider::new(url)?))
        }
        None => Ok(Arc::new(RuleBasedProvider)),
    }
}

#[async_trait]
pub trait EarlyWarningServiceTrait: Send + Sync {
    async fn evaluate(&self, profile_id: i64) -> Result<EarlyWarning, ServiceError>;
}

pub struct EarlyWarningService {
    profiles: Arc<dyn Repository<Profile>>,
    health_records: Arc<dyn Repository<HealthRecord>>,
    education: Arc<dyn Repository<EducationRecord>>,
    provider: Arc<dyn EarlyWarningProvider>,
}

impl EarlyWarningService {
    pub fn new(
        profiles: Arc<dyn Repository<Profile>>,
        health_records: Arc<dyn Repository<HealthRecord>>,
        education: Arc<dyn Repository<EducationRecord>>,
        provider: Arc<dyn EarlyWarningProvider>,
    ) -> Self {
        Self {
            profiles,
            health_records,
            education,
            provider,
        }
    }

    /// Gather what the rules look at
    pub async fn facts(&self, profile_id: i64) -> Result<EarlyWarningFacts, ServiceError> {
        let profile = self
            .profiles
            .get(profile_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Profile with ID {} not found", profile_id)))?;

        let (records, health_record_count) = self.health_records.list(ListQuery::children_of(profile_id)).await?;

        // Newest enrollment sorts first
        let (latest, _) = self
            .education
            .list(ListQuery {
                limit: Some(1),
                ..ListQuery::children_of(profile_id)
            })
            .await?;

        Ok(EarlyWarningFacts {
            profile_id,
            age: age_on(profile.birth_date, Utc::now().date_naive()),
            health_record_count,
            max_gravida: records.iter().map(|r| r.gravida).max(),
            latest_enrollment_status: latest.first().map(|e| e.enrollment_status),
        })
    }
}

#[async_trait]
impl EarlyWarningServiceTrait for EarlyWarningService {
    async fn evaluate(&self, profile_id: i64) -> Result<EarlyWarning, ServiceError> {
        let facts = self.facts(profile_id).await?;
        let warning = self.provider.evaluate(&facts).await?;
        if warning.repeated_pregnancy || warning.dropout_risk {
            info!(
                "Early warning raised for profile {} (repeated_pregnancy={}, dropout_risk={})",
                profile_id, warning.repeated_pregnancy, warning.dropout_risk
            );
        }
        Ok(warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EducationRequest;
    use crate::services::education::{EducationService, EducationServiceTrait};
    use crate::services::profile::tests::{profile_request, service as profile_service};
    use crate::services::profile::ProfileServiceTrait;
    use axum::{routing::post, Json, Router};
    use chrono::NaiveDate;
    use maternal_care_data::models::ProgramType;
    use maternal_care_data::repository::Storage;

    fn facts(age: i32, records: usize, gravida: Option<i32>, status: Option<EnrollmentStatus>) -> EarlyWarningFacts {
        EarlyWarningFacts {
            profile_id: 20240001,
            age,
            health_record_count: records,
            max_gravida: gravida,
            latest_enrollment_status: status,
        }
    }

    #[test]
    fn test_rules_flag_repeated_pregnancy() {
        let rules = RuleBasedProvider;

        let two_records = rules.assess(&facts(19, 2, Some(1), Some(EnrollmentStatus::Enrolled)));
        assert!(two_records.repeated_pregnancy);
        assert!(!two_records.dropout_risk);

        let second_gravida = rules.assess(&facts(19, 1, Some(2), Some(EnrollmentStatus::Enrolled)));
        assert!(second_gravida.repeated_pregnancy);

        let first = rules.assess(&facts(19, 1, Some(1), Some(EnrollmentStatus::Enrolled)));
        assert!(!first.repeated_pregnancy);
        assert!(first.reasons.is_empty());
        assert_eq!(first.source, "rules");
    }

    #[test]
    fn test_rules_flag_dropout_risk() {
        let rules = RuleBasedProvider;

        assert!(rules.assess(&facts(17, 0, None, Some(EnrollmentStatus::DroppedOut))).dropout_risk);
        assert!(rules.assess(&facts(17, 0, None, None)).dropout_risk);
        assert!(!rules.assess(&facts(22, 0, None, None)).dropout_risk);
        assert!(!rules.assess(&facts(17, 0, None, Some(EnrollmentStatus::Completed))).dropout_risk);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_rules() {
        // Nothing listens on the discard port
        let provider = RemoteProvider::new("http://127.0.0.1:9/early-warning").unwrap();
        let warning = provider.evaluate(&facts(17, 2, Some(2), None)).await.unwrap();

        assert_eq!(warning.source, "rules");
        assert!(warning.repeated_pregnancy);
        assert!(warning.dropout_risk);
    }

    #[tokio::test]
    async fn test_remote_verdict_is_used() {
        async fn verdict(Json(facts): Json<EarlyWarningFacts>) -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "repeated_pregnancy": false,
                "dropout_risk": facts.age < 18,
                "reasons": ["scored remotely"]
            }))
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/score", post(verdict)))
                .await
                .unwrap();
        });

        let provider = RemoteProvider::new(format!("http://{}/score", address)).unwrap();
        let warning = provider.evaluate(&facts(16, 3, Some(3), None)).await.unwrap();

        assert_eq!(warning.source, "remote");
        assert!(!warning.repeated_pregnancy);
        assert!(warning.dropout_risk);
        assert_eq!(warning.reasons, vec!["scored remotely".to_string()]);
    }

    #[tokio::test]
    async fn test_service_gathers_facts() {
        let storage = Storage::memory();
        let profile = profile_service(&storage)
            .create_profile(profile_request("Maria"))
            .await
            .unwrap();
        let education = EducationService::new(Arc::new(storage.clone()), Arc::new(storage.clone()));
        education
            .create_education(
                profile.profile_id,
                EducationRequest {
                    program_type: ProgramType::Formal,
                    institution: "Lahug National High School".to_string(),
                    level_or_course: "Grade 10".to_string(),
                    enrollment_status: EnrollmentStatus::DroppedOut,
                    start_date: NaiveDate::from_ymd_opt(2023, 6, 5).unwrap(),
                    end_date: None,
                    remarks: None,
                },
            )
            .await
            .unwrap();

        let service = EarlyWarningService::new(
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            provider_for(None).unwrap(),
        );

        let facts = service.facts(profile.profile_id).await.unwrap();
        assert_eq!(facts.health_record_count, 0);
        assert_eq!(facts.latest_enrollment_status, Some(EnrollmentStatus::DroppedOut));

        let warning = service.evaluate(profile.profile_id).await.unwrap();
        assert!(warning.dropout_risk);
        assert!(!warning.repeated_pregnancy);

        let missing = service.evaluate(20249999).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }
}
