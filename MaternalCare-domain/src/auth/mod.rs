//! Authentication module for MaternalCare API
//!
//! Password accounts, JWT bearer tokens, the middleware that protects
//! `/api/v1`, and role checks for the admin routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use maternal_care_data::models::Role;

use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};

pub mod authorize;
pub mod logging;
pub mod password;
pub mod token;

pub use token::{SecurityError, TokenSettings};

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Caller identity placed in request extensions by `auth_middleware`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl TryFrom<&Claims> for UserInfo {
    type Error = SecurityError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| SecurityError::InvalidToken)?;
        Ok(Self {
            user_id,
            email: claims.email.clone(),
            role: claims.role,
        })
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or("Authorization header does not contain Bearer token")
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Authentication middleware for protected routes
pub async fn auth_middleware(
    State(settings): State<Arc<TokenSettings>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let request_path = req.uri().path().to_string();
    let start_time = std::time::Instant::now();

    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_string(),
        Err(reason) => {
            debug!("{} for {}", reason, request_path);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(reason)
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            return unauthorized(reason);
        }
    };

    let validated = settings
        .validate_token(&token)
        .and_then(|claims| UserInfo::try_from(&claims).map(|user| (claims, user)));

    match validated {
        Ok((claims, user_info)) => {
            debug!("Token validated for user: {}", claims.sub);

            let event = AuthEvent::new(AuthEventType::TokenValidation, Some(&claims.sub), true)
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            req.extensions_mut().insert(user_info);
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            warn!("Rejected bearer token for {}: {}", request_path, e);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(e.to_string())
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            let message = match e {
                SecurityError::TokenExpired => "Token has expired",
                _ => "Invalid or malformed token",
            };
            unauthorized(message)
        }
    }
}

/// Configure CORS and security response headers for the application
pub fn configure_auth(app: axum::Router) -> axum::Router {
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::set_header::SetResponseHeaderLayer;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        ));

    app.layer(cors).layer(security_headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension, Router};
    use chrono::Utc;
    use maternal_care_data::models::User;
    use tower::ServiceExt;

    fn settings() -> Arc<TokenSettings> {
        Arc::new(TokenSettings::new("middleware-test-secret", "test-issuer", 5))
    }

    fn app(settings: Arc<TokenSettings>) -> Router {
        async fn whoami(Extension(user): Extension<UserInfo>) -> String {
            user.email
        }

        Router::new()
            .route("/private", get(whoami))
            .layer(middleware::from_fn_with_state(settings, auth_middleware))
    }

    fn token_for(settings: &TokenSettings) -> String {
        let user = User {
            id: Uuid::new_v4(),
            email: "worker@example.org".to_string(),
            full_name: "Field Worker".to_string(),
            password_hash: String::new(),
            role: Role::Worker,
            created_at: Utc::now(),
        };
        settings.generate_token(&user).unwrap()
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(settings())
            .oneshot(Request::builder().uri("/private").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let settings = settings();
        let token = token_for(&settings);

        let response = app(settings)
            .oneshot(
                Request::builder()
                    .uri("/private")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_unauthorized() {
        let foreign = TokenSettings::new("another-secret", "test-issuer", 5);
        let token = token_for(&foreign);

        let response = app(settings())
            .oneshot(
                Request::builder()
                    .uri("/private")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_security_headers_are_set() {
        let app = configure_auth(Router::new().route("/open", get(|| async { "ok" })));
        let response = app
            .oneshot(Request::builder().uri("/open").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
        assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");
    }
}
