use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use tracing::{info, instrument};
use uuid::Uuid;

use maternal_care_domain::auth::UserInfo;
use maternal_care_domain::entities::{CreateUserRequest, UserSummary};

use crate::api::AppState;
use crate::entities::ErrorResponse;

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All accounts", body = [UserSummary]),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, ErrorResponse> {
    Ok(Json(state.services.users.list_users().await?))
}

/// Create an account with any role
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserSummary),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[instrument(skip(state, admin, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(admin): Extension<UserInfo>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let user = state.services.users.create_user(request).await?;
    info!("Admin {} created user {} with role {}", admin.email, user.id, user.role);
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account found", body = UserSummary),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, ErrorResponse> {
    Ok(Json(state.services.users.get_user(id).await?))
}
