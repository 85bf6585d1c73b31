use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

/// Registers the `bearer` scheme referenced by the protected paths
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Auth endpoints
        crate::api::handlers::auth::signup,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::auth_info,

        // Address selector
        crate::api::handlers::address::list_regions,
        crate::api::handlers::address::list_provinces,
        crate::api::handlers::address::list_municipalities,
        crate::api::handlers::address::list_barangays,
        crate::api::handlers::address::select_address,

        // Profiles and partners
        crate::api::handlers::profiles::list_profiles,
        crate::api::handlers::profiles::create_profile,
        crate::api::handlers::profiles::get_profile,
        crate::api::handlers::profiles::update_profile,
        crate::api::handlers::profiles::get_partner,
        crate::api::handlers::profiles::upsert_partner,
        crate::api::handlers::early_warning::get_early_warning,

        // Health records, children and visits
        crate::api::handlers::health_records::list_health_records,
        crate::api::handlers::health_records::create_health_record,
        crate::api::handlers::health_records::get_health_record,
        crate::api::handlers::health_records::update_health_record,
        crate::api::handlers::health_records::get_health_summary,
        crate::api::handlers::children::list_children,
        crate::api::handlers::children::create_child,
        crate::api::handlers::children::get_child,
        crate::api::handlers::children::update_child,
        crate::api::handlers::visits::list_visits,
        crate::api::handlers::visits::create_visit,
        crate::api::handlers::visits::get_visit,
        crate::api::handlers::visits::update_visit,

        // Education
        crate::api::handlers::education::list_education,
        crate::api::handlers::education::create_education,
        crate::api::handlers::education::get_education,
        crate::api::handlers::education::update_education,

        // Admin
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::create_user,
        crate::api::handlers::users::get_user
    ),
    components(
        schemas(
            // Storage models
            maternal_care_domain::models::Address,
            maternal_care_domain::models::Profile,
            maternal_care_domain::models::Partner,
            maternal_care_domain::models::HealthRecord,
            maternal_care_domain::models::ChildRecord,
            maternal_care_domain::models::VisitRecord,
            maternal_care_domain::models::EducationRecord,
            maternal_care_domain::models::PregnancyStatus,
            maternal_care_domain::models::Sex,
            maternal_care_domain::models::VisitType,
            maternal_care_domain::models::ProgramType,
            maternal_care_domain::models::EnrollmentStatus,
            maternal_care_domain::models::Role,
            maternal_care_domain::reference::AddressArea,
            maternal_care_domain::reference::AddressLevel,

            // Requests and derived views
            maternal_care_domain::entities::ProfileRequest,
            maternal_care_domain::entities::PartnerRequest,
            maternal_care_domain::entities::HealthRecordRequest,
            maternal_care_domain::entities::ChildRecordRequest,
            maternal_care_domain::entities::VisitRecordRequest,
            maternal_care_domain::entities::EducationRequest,
            maternal_care_domain::entities::HealthRecordSummary,
            maternal_care_domain::entities::BloodPressureCategory,
            maternal_care_domain::entities::AddressSelectRequest,
            maternal_care_domain::entities::AddressSelectResponse,
            maternal_care_domain::entities::AddressOptions,
            maternal_care_domain::entities::EarlyWarning,
            maternal_care_domain::entities::EarlyWarningFacts,

            // Auth schemas
            maternal_care_domain::entities::SignupRequest,
            maternal_care_domain::entities::CreateUserRequest,
            maternal_care_domain::entities::LoginRequest,
            maternal_care_domain::entities::LoginResponse,
            maternal_care_domain::entities::UserSummary,
            maternal_care_domain::auth::UserInfo,
            maternal_care_domain::auth::Claims,

            // Common
            crate::entities::common::ErrorResponse,
            crate::entities::common::PaginationParams,
            crate::entities::common::ProfilePage,
            crate::entities::common::HealthRecordPage,
            crate::entities::common::ChildRecordPage,
            crate::entities::common::VisitRecordPage,
            crate::entities::common::EducationPage,
            crate::api::handlers::profiles::ProfileListParams,
            crate::api::handlers::health_records::SummaryParams,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "Authentication", description = "Sign-up, login and token introspection"),
        (name = "address", description = "Cascading region, province, municipality and barangay selector"),
        (name = "profiles", description = "Teen-parent profiles and partners"),
        (name = "health_records", description = "Maternal health records and summaries"),
        (name = "children", description = "Children born from a recorded pregnancy"),
        (name = "visits", description = "Prenatal and postnatal visits"),
        (name = "education", description = "Education and training enrollments"),
        (name = "early_warning", description = "Repeated-pregnancy and dropout flags"),
        (name = "admin", description = "Account management, admin only")
    ),
    info(
        title = "MaternalCare API",
        version = "0.1.0",
        description = "Case management for maternal and teen-parent health programs",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
