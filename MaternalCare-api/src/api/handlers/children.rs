use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use maternal_care_domain::entities::ChildRecordRequest;
use maternal_care_domain::models::ChildRecord;

use crate::api::AppState;
use crate::entities::common::ChildRecordPage;
use crate::entities::{ErrorResponse, PaginatedResponse, PaginationParams};

#[utoipa::path(
    get,
    path = "/api/v1/health-records/{id}/children",
    params(("id" = i64, Path, description = "Health record ID"), PaginationParams),
    responses(
        (status = 200, description = "Children born from this pregnancy", body = ChildRecordPage),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "children"
)]
#[instrument(skip(state))]
pub async fn list_children(
    State(state): State<AppState>,
    Path(health_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<ChildRecord>>, ErrorResponse> {
    let (limit, offset) = params.resolve();
    let (children, total) = state
        .services
        .health_records
        .list_children(health_id, Some(limit), Some(offset))
        .await?;

    let base_url = format!("/api/v1/health-records/{}/children", health_id);
    Ok(Json(PaginatedResponse::new(children, total, limit, offset, &base_url, &[])))
}

#[utoipa::path(
    post,
    path = "/api/v1/health-records/{id}/children",
    params(("id" = i64, Path, description = "Health record ID")),
    request_body = ChildRecordRequest,
    responses(
        (status = 201, description = "Child recorded", body = ChildRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Health record not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "children"
)]
#[instrument(skip(state, request))]
pub async fn create_child(
    State(state): State<AppState>,
    Path(health_id): Path<i64>,
    Json(request): Json<ChildRecordRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let child = state.services.health_records.create_child(health_id, request).await?;
    info!("Child {} recorded under health record {}", child.child_id, health_id);
    Ok((StatusCode::CREATED, Json(child)))
}

#[utoipa::path(
    get,
    path = "/api/v1/children/{id}",
    params(("id" = i64, Path, description = "Child ID")),
    responses(
        (status = 200, description = "Child found", body = ChildRecord),
        (status = 404, description = "Child not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "children"
)]
#[instrument(skip(state))]
pub async fn get_child(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ChildRecord>, ErrorResponse> {
    Ok(Json(state.services.health_records.get_child(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/children/{id}",
    params(("id" = i64, Path, description = "Child ID")),
    request_body = ChildRecordRequest,
    responses(
        (status = 200, description = "Child updated", body = ChildRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Child not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "children"
)]
#[instrument(skip(state, request))]
pub async fn update_child(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ChildRecordRequest>,
) -> Result<Json<ChildRecord>, ErrorResponse> {
    Ok(Json(state.services.health_records.update_child(id, request).await?))
}
