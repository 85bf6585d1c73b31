use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use maternal_care_domain::auth::authorize::require_role;
use maternal_care_domain::auth::{auth_middleware, configure_auth};
use maternal_care_domain::models::Role;

use super::handlers::{
    address, auth, children, early_warning, education, health, health_records, profiles, users, visits,
};
use super::AppState;
use crate::openapi::configure_swagger_routes;

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Routes under /api/v1/admin, admin role only
    let admin_routes = Router::new()
        .route("/admin/users", get(users::list_users).post(users::create_user))
        .route("/admin/users/:id", get(users::get_user))
        .layer(middleware::from_fn(require_role(Role::Admin)));

    // Routes that require authentication
    let api_routes = Router::new()
        .route("/address/regions", get(address::list_regions))
        .route("/address/regions/:code/provinces", get(address::list_provinces))
        .route("/address/provinces/:code/municipalities", get(address::list_municipalities))
        .route("/address/municipalities/:code/barangays", get(address::list_barangays))
        .route("/address/select", post(address::select_address))
        .route("/profiles", get(profiles::list_profiles).post(profiles::create_profile))
        .route("/profiles/:id", get(profiles::get_profile).put(profiles::update_profile))
        .route("/profiles/:id/partner", get(profiles::get_partner).put(profiles::upsert_partner))
        .route("/profiles/:id/early-warning", get(early_warning::get_early_warning))
        .route(
            "/profiles/:id/health-records",
            get(health_records::list_health_records).post(health_records::create_health_record),
        )
        .route(
            "/profiles/:id/education",
            get(education::list_education).post(education::create_education),
        )
        .route(
            "/health-records/:id",
            get(health_records::get_health_record).put(health_records::update_health_record),
        )
        .route("/health-records/:id/summary", get(health_records::get_health_summary))
        .route(
            "/health-records/:id/children",
            get(children::list_children).post(children::create_child),
        )
        .route("/health-records/:id/visits", get(visits::list_visits).post(visits::create_visit))
        .route("/children/:id", get(children::get_child).put(children::update_child))
        .route("/visits/:id", get(visits::get_visit).put(visits::update_visit))
        .route("/education/:id", get(education::get_education).put(education::update_education))
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.tokens.clone(), auth_middleware));

    debug!("API routes configured");

    let auth_routes = Router::new()
        .route("/auth/info", get(auth::auth_info))
        .layer(middleware::from_fn_with_state(state.tokens.clone(), auth_middleware));

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    let app = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(configure_swagger_routes());

    debug!("Swagger UI merged");

    let app = configure_auth(app).layer(TraceLayer::new_for_http());
    debug!("Security configuration applied");

    health::initialize_server_start_time();

    app
}
