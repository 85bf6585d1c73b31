use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use maternal_care_domain::entities::VisitRecordRequest;
use maternal_care_domain::models::VisitRecord;

use crate::api::AppState;
use crate::entities::common::VisitRecordPage;
use crate::entities::{ErrorResponse, PaginatedResponse, PaginationParams};

/// Visits of a health record, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/health-records/{id}/visits",
    params(("id" = i64, Path, description = "Health record ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of visits", body = VisitRecordPage),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "visits"
)]
#[instrument(skip(state))]
pub async fn list_visits(
    State(state): State<AppState>,
    Path(health_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<VisitRecord>>, ErrorResponse> {
    let (limit, offset) = params.resolve();
    let (visits, total) = state
        .services
        .health_records
        .list_visits(health_id, Some(limit), Some(offset))
        .await?;

    let base_url = format!("/api/v1/health-records/{}/visits", health_id);
    Ok(Json(PaginatedResponse::new(visits, total, limit, offset, &base_url, &[])))
}

#[utoipa::path(
    post,
    path = "/api/v1/health-records/{id}/visits",
    params(("id" = i64, Path, description = "Health record ID")),
    request_body = VisitRecordRequest,
    responses(
        (status = 201, description = "Visit recorded", body = VisitRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "visits"
)]
#[instrument(skip(state, request))]
pub async fn create_visit(
    State(state): State<AppState>,
    Path(health_id): Path<i64>,
    Json(request): Json<VisitRecordRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let visit = state.services.health_records.create_visit(health_id, request).await?;
    info!("Visit {} recorded under health record {}", visit.visit_id, health_id);
    Ok((StatusCode::CREATED, Json(visit)))
}

#[utoipa::path(
    get,
    path = "/api/v1/visits/{id}",
    params(("id" = i64, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit found", body = VisitRecord),
        (status = 404, description = "Visit not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "visits"
)]
#[instrument(skip(state))]
pub async fn get_visit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VisitRecord>, ErrorResponse> {
    Ok(Json(state.services.health_records.get_visit(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/visits/{id}",
    params(("id" = i64, Path, description = "Visit ID")),
    request_body = VisitRecordRequest,
    responses(
        (status = 200, description = "Visit updated", body = VisitRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Visit not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "visits"
)]
#[instrument(skip(state, request))]
pub async fn update_visit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<VisitRecordRequest>,
) -> Result<Json<VisitRecord>, ErrorResponse> {
    Ok(Json(state.services.health_records.update_visit(id, request).await?))
}
