use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use maternal_care_domain::entities::{HealthRecordRequest, HealthRecordSummary};
use maternal_care_domain::models::HealthRecord;

use crate::api::AppState;
use crate::entities::common::HealthRecordPage;
use crate::entities::{ErrorResponse, PaginatedResponse, PaginationParams};

/// Query parameters for the health summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    /// Date to compute gestational age for (default: today)
    pub as_of: Option<NaiveDate>,
}

/// List the health records of a profile, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/health-records",
    params(("id" = i64, Path, description = "Profile ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of health records", body = HealthRecordPage),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "health_records"
)]
#[instrument(skip(state))]
pub async fn list_health_records(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<HealthRecord>>, ErrorResponse> {
    let (limit, offset) = params.resolve();
    let (records, total) = state
        .services
        .health_records
        .list_health_records(profile_id, Some(limit), Some(offset))
        .await?;

    let base_url = format!("/api/v1/profiles/{}/health-records", profile_id);
    Ok(Json(PaginatedResponse::new(records, total, limit, offset, &base_url, &[])))
}

/// Open a health record for a profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles/{id}/health-records",
    params(("id" = i64, Path, description = "Profile ID")),
    request_body = HealthRecordRequest,
    responses(
        (status = 201, description = "Health record created", body = HealthRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "health_records"
)]
#[instrument(skip(state, request))]
pub async fn create_health_record(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(request): Json<HealthRecordRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let record = state
        .services
        .health_records
        .create_health_record(profile_id, request)
        .await?;
    info!("Health record {} created for profile {}", record.health_id, profile_id);
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/v1/health-records/{id}",
    params(("id" = i64, Path, description = "Health record ID")),
    responses(
        (status = 200, description = "Health record found", body = HealthRecord),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "health_records"
)]
#[instrument(skip(state))]
pub async fn get_health_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<HealthRecord>, ErrorResponse> {
    Ok(Json(state.services.health_records.get_health_record(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/health-records/{id}",
    params(("id" = i64, Path, description = "Health record ID")),
    request_body = HealthRecordRequest,
    responses(
        (status = 200, description = "Health record updated", body = HealthRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "health_records"
)]
#[instrument(skip(state, request))]
pub async fn update_health_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<HealthRecordRequest>,
) -> Result<Json<HealthRecord>, ErrorResponse> {
    Ok(Json(state.services.health_records.update_health_record(id, request).await?))
}

/// Derived figures for a health record: gestational age, EDD, visit counts and blood pressure
#[utoipa::path(
    get,
    path = "/api/v1/health-records/{id}/summary",
    params(("id" = i64, Path, description = "Health record ID"), SummaryParams),
    responses(
        (status = 200, description = "Health record summary", body = HealthRecordSummary),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "health_records"
)]
#[instrument(skip(state))]
pub async fn get_health_summary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<HealthRecordSummary>, ErrorResponse> {
    let as_of = params.as_of.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(state.services.health_records.summarize(id, as_of).await?))
}
