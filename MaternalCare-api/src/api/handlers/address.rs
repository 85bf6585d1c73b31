use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, instrument};

use maternal_care_domain::entities::{AddressSelectRequest, AddressSelectResponse};
use maternal_care_domain::reference::AddressArea;

use crate::api::AppState;
use crate::entities::ErrorResponse;

#[utoipa::path(
    get,
    path = "/api/v1/address/regions",
    responses(
        (status = 200, description = "All regions", body = [AddressArea])
    ),
    security(("bearer" = [])),
    tag = "address"
)]
pub async fn list_regions(State(state): State<AppState>) -> Json<Vec<AddressArea>> {
    Json(state.services.address.regions())
}

#[utoipa::path(
    get,
    path = "/api/v1/address/regions/{code}/provinces",
    params(("code" = String, Path, description = "Region code")),
    responses(
        (status = 200, description = "Provinces of the region", body = [AddressArea]),
        (status = 404, description = "Unknown region", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "address"
)]
pub async fn list_provinces(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<AddressArea>>, ErrorResponse> {
    Ok(Json(state.services.address.provinces(&code)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/address/provinces/{code}/municipalities",
    params(("code" = String, Path, description = "Province code")),
    responses(
        (status = 200, description = "Municipalities and cities of the province", body = [AddressArea]),
        (status = 404, description = "Unknown province", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "address"
)]
pub async fn list_municipalities(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<AddressArea>>, ErrorResponse> {
    Ok(Json(state.services.address.municipalities(&code)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/address/municipalities/{code}/barangays",
    params(("code" = String, Path, description = "Municipality code")),
    responses(
        (status = 200, description = "Barangays of the municipality", body = [AddressArea]),
        (status = 404, description = "Unknown municipality", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "address"
)]
pub async fn list_barangays(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<AddressArea>>, ErrorResponse> {
    Ok(Json(state.services.address.barangays(&code)?))
}

/// Change one level of an address selection
///
/// Levels below the changed one are reset; the response carries the option
/// lists that are valid for the new selection.
#[utoipa::path(
    post,
    path = "/api/v1/address/select",
    request_body = AddressSelectRequest,
    responses(
        (status = 200, description = "Updated selection and options", body = AddressSelectResponse),
        (status = 400, description = "Code does not fit the current selection", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "address"
)]
#[instrument(skip(state, request))]
pub async fn select_address(
    State(state): State<AppState>,
    Json(request): Json<AddressSelectRequest>,
) -> Result<Json<AddressSelectResponse>, ErrorResponse> {
    debug!("Address select: {} -> '{}'", request.level, request.code);
    let response = state
        .services
        .address
        .select(&request.selection, request.level, &request.code)?;
    Ok(Json(response))
}
