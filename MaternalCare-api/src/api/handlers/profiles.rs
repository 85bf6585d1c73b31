use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use maternal_care_domain::entities::{PartnerRequest, ProfileRequest};
use maternal_care_domain::models::{Partner, Profile};

use crate::api::AppState;
use crate::entities::common::ProfilePage;
use crate::entities::{ErrorResponse, PaginatedResponse, PaginationParams};

/// Query parameters for the profile list
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProfileListParams {
    /// Case-insensitive fragment of the first, middle or last name
    pub search: Option<String>,

    /// Maximum number of results (default: 20, max: 100)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,
}

/// List profiles, newest first
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    params(ProfileListParams),
    responses(
        (status = 200, description = "Page of profiles", body = ProfilePage),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(params): Query<ProfileListParams>,
) -> Result<Json<PaginatedResponse<Profile>>, ErrorResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let search = params.search.filter(|s| !s.trim().is_empty());

    let (profiles, total) = state
        .services
        .profiles
        .list_profiles(search.clone(), Some(limit), Some(offset))
        .await?;

    let extra: Vec<(&str, &str)> = search.as_deref().map(|s| ("search", s)).into_iter().collect();
    Ok(Json(PaginatedResponse::new(profiles, total, limit, offset, "/api/v1/profiles", &extra)))
}

/// Register a profile
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    request_body = ProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "No identifiers left for this year", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
#[instrument(skip(state, request))]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let profile = state.services.profiles.create_profile(request).await?;
    info!("Profile created with ID: {}", profile.profile_id);
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    params(("id" = i64, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Profile>, ErrorResponse> {
    Ok(Json(state.services.profiles.get_profile(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}",
    params(("id" = i64, Path, description = "Profile ID")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
#[instrument(skip(state, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<Profile>, ErrorResponse> {
    Ok(Json(state.services.profiles.update_profile(id, request).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/partner",
    params(("id" = i64, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Partner of the profile", body = Partner),
        (status = 404, description = "Profile or partner not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
#[instrument(skip(state))]
pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Partner>, ErrorResponse> {
    Ok(Json(state.services.profiles.get_partner(id).await?))
}

/// Create or replace the partner record of a profile
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}/partner",
    params(("id" = i64, Path, description = "Profile ID")),
    request_body = PartnerRequest,
    responses(
        (status = 200, description = "Partner saved", body = Partner),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
#[instrument(skip(state, request))]
pub async fn upsert_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<PartnerRequest>,
) -> Result<Json<Partner>, ErrorResponse> {
    Ok(Json(state.services.profiles.upsert_partner(id, request).await?))
}
