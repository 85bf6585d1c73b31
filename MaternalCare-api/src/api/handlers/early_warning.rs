use axum::extract::{Json, Path, State};
use tracing::{info, instrument};

use maternal_care_domain::entities::EarlyWarning;

use crate::api::AppState;
use crate::entities::ErrorResponse;

/// Early-warning flags for a profile
///
/// Uses the remote scoring service when one is configured and falls back to
/// the local rules when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/early-warning",
    params(("id" = i64, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Early-warning flags", body = EarlyWarning),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "early_warning"
)]
#[instrument(skip(state))]
pub async fn get_early_warning(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<EarlyWarning>, ErrorResponse> {
    let warning = state.services.early_warning.evaluate(profile_id).await?;
    if warning.repeated_pregnancy || warning.dropout_risk {
        info!(
            "Profile {} flagged (repeated_pregnancy={}, dropout_risk={}, source={})",
            profile_id, warning.repeated_pregnancy, warning.dropout_risk, warning.source
        );
    }
    Ok(Json(warning))
}
