use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use serde_json::json;
use tracing::{debug, warn};

use maternal_care_data::models::Role;

use crate::auth::logging::{log_access_denied, log_auth_event, AuthEvent, AuthEventType};
use crate::auth::UserInfo;

/// Middleware for role-based access control
///
/// Must run after `auth_middleware`, which puts the caller's `UserInfo` in
/// the request extensions. Callers holding none of `required_roles` get 403.
pub async fn require_roles(req: Request<Body>, next: Next, required_roles: Vec<Role>) -> Response {
    let request_path = req.uri().path().to_string();

    match req.extensions().get::<UserInfo>() {
        Some(user) if required_roles.contains(&user.role) => {
            debug!("User {} has required role for resource access: {}", user.user_id, request_path);
            next.run(req).await
        }
        Some(user) => {
            let required: Vec<String> = required_roles.iter().map(|r| r.to_string()).collect();
            warn!(
                "User {} ({}) lacks required roles {:?} for resource: {}",
                user.user_id, user.role, required, request_path
            );
            log_access_denied(&user.user_id.to_string(), &request_path, &required);

            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "forbidden",
                    "message": "You don't have the required permissions to access this resource",
                    "required_roles": required
                })),
            )
                .into_response()
        }
        None => {
            warn!("No user info found in request extensions for path: {}", request_path);

            let event = AuthEvent::new(AuthEventType::AccessDenied, None, false)
                .with_details("Authentication context missing in request extensions")
                .with_resource(request_path)
                .with_auth_method("rbac");
            log_auth_event(event);

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "unauthorized",
                    "message": "Authentication required"
                })),
            )
                .into_response()
        }
    }
}

/// Middleware factory that requires a specific role for access
///
/// ```ignore
/// let admin_routes = Router::new()
///     .route("/admin/users", get(list_users))
///     .layer(middleware::from_fn(require_role(Role::Admin)));
/// ```
pub fn require_role(role: Role) -> impl Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Clone + Send + 'static {
    require_any_role(&[role])
}

/// Middleware factory that accepts any of `roles`
pub fn require_any_role(roles: &[Role]) -> impl Fn(Request<Body>, Next) -> BoxFuture<'static, Response> + Clone + Send + 'static {
    let roles = roles.to_vec();
    move |req: Request<Body>, next: Next| -> BoxFuture<'static, Response> {
        let roles = roles.clone();
        Box::pin(async move { require_roles(req, next, roles).await })
    }
}
