use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use maternal_care_domain::entities::EducationRequest;
use maternal_care_domain::models::EducationRecord;

use crate::api::AppState;
use crate::entities::common::EducationPage;
use crate::entities::{ErrorResponse, PaginatedResponse, PaginationParams};

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/education",
    params(("id" = i64, Path, description = "Profile ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of enrollments, most recent first", body = EducationPage),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "education"
)]
#[instrument(skip(state))]
pub async fn list_education(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<EducationRecord>>, ErrorResponse> {
    let (limit, offset) = params.resolve();
    let (records, total) = state
        .services
        .education
        .list_education(profile_id, Some(limit), Some(offset))
        .await?;

    let base_url = format!("/api/v1/profiles/{}/education", profile_id);
    Ok(Json(PaginatedResponse::new(records, total, limit, offset, &base_url, &[])))
}

#[utoipa::path(
    post,
    path = "/api/v1/profiles/{id}/education",
    params(("id" = i64, Path, description = "Profile ID")),
    request_body = EducationRequest,
    responses(
        (status = 201, description = "Enrollment recorded", body = EducationRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "education"
)]
#[instrument(skip(state, request))]
pub async fn create_education(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(request): Json<EducationRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let record = state.services.education.create_education(profile_id, request).await?;
    info!("Enrollment {} recorded for profile {}", record.education_id, profile_id);
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/v1/education/{id}",
    params(("id" = i64, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment found", body = EducationRecord),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "education"
)]
#[instrument(skip(state))]
pub async fn get_education(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EducationRecord>, ErrorResponse> {
    Ok(Json(state.services.education.get_education(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/education/{id}",
    params(("id" = i64, Path, description = "Enrollment ID")),
    request_body = EducationRequest,
    responses(
        (status = 200, description = "Enrollment updated", body = EducationRecord),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "education"
)]
#[instrument(skip(state, request))]
pub async fn update_education(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EducationRequest>,
) -> Result<Json<EducationRecord>, ErrorResponse> {
    Ok(Json(state.services.education.update_education(id, request).await?))
}
