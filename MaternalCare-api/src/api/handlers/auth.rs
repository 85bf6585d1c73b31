use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use tracing::{info, instrument};

use maternal_care_domain::auth::UserInfo;
use maternal_care_domain::entities::{LoginRequest, LoginResponse, SignupRequest, UserSummary};

use crate::api::AppState;
use crate::entities::ErrorResponse;

/// Public sign-up; creates a worker account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserSummary),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let user = state.services.users.signup(request).await?;
    info!("Signed up user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint - authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful. Use the returned access_token in the Authorization header as 'Bearer {token}'.", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication",
    operation_id = "login"
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorResponse> {
    Ok(Json(state.services.users.login(request).await?))
}

/// Identity behind the presented token
#[utoipa::path(
    get,
    path = "/auth/info",
    responses(
        (status = 200, description = "Authentication information", body = UserInfo),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer" = []))
)]
pub async fn auth_info(Extension(user_info): Extension<UserInfo>) -> Json<UserInfo> {
    Json(user_info)
}
