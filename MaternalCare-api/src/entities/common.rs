use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use maternal_care_domain::models::{ChildRecord, EducationRecord, HealthRecord, Profile, VisitRecord};
use maternal_care_domain::services::ServiceError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" | "id_exhausted" => StatusCode::CONFLICT,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => {
                warn!("Rejected request: {}", msg);
                Self::new("validation_error", msg)
            }
            ServiceError::NotFound(msg) => Self::new("not_found", msg),
            ServiceError::Conflict(msg) => Self::new("conflict", msg),
            ServiceError::IdExhausted(msg) => {
                warn!("Identifier space exhausted: {}", msg);
                Self::new("id_exhausted", msg)
            }
            ServiceError::Unauthorized(msg) => Self::new("unauthorized", msg),
            ServiceError::Forbidden(msg) => Self::new("forbidden", msg),
            // Storage messages are passed through as-is
            ServiceError::Repository(msg) | ServiceError::Internal(msg) => {
                error!("Request failed: {}", msg);
                Self::new("internal_error", msg)
            }
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Query parameters for paginated requests
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Number of results to return (default: 20, max: 100)
    pub limit: Option<usize>,

    /// Number of results to skip (default: 0)
    pub offset: Option<usize>,
}

impl PaginationParams {
    /// Limit and offset with defaults applied and the limit capped
    pub fn resolve(&self) -> (usize, usize) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        (limit, self.offset.unwrap_or(0))
    }
}

/// Paginated response format
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    ProfilePage = PaginatedResponse<Profile>,
    HealthRecordPage = PaginatedResponse<HealthRecord>,
    ChildRecordPage = PaginatedResponse<ChildRecord>,
    VisitRecordPage = PaginatedResponse<VisitRecord>,
    EducationPage = PaginatedResponse<EducationRecord>
)]
pub struct PaginatedResponse<T> {
    /// Total count of items available
    pub total_count: usize,

    /// Current offset
    pub offset: usize,

    /// Current limit
    pub limit: usize,

    /// URL for the next page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// URL for the previous page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Actual data items
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// Wrap one page, with links relative to `base_url`
    ///
    /// `extra` holds query parameters to carry over into the links.
    pub fn new(data: Vec<T>, total_count: usize, limit: usize, offset: usize, base_url: &str, extra: &[(&str, &str)]) -> Self {
        let (next, previous) = generate_pagination_links(total_count, limit, offset, base_url, extra);
        Self {
            total_count,
            offset,
            limit,
            next,
            previous,
            data,
        }
    }
}

/// Generate next/previous links for a page
pub fn generate_pagination_links(
    total_count: usize,
    limit: usize,
    offset: usize,
    base_url: &str,
    extra: &[(&str, &str)],
) -> (Option<String>, Option<String>) {
    let link = |offset: usize| {
        let mut query_parts: Vec<String> = extra
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        query_parts.push(format!("limit={}", limit));
        query_parts.push(format!("offset={}", offset));
        format!("{}?{}", base_url, query_parts.join("&"))
    };

    let next = offset
        .checked_add(limit)
        .filter(|end| *end < total_count)
        .map(link);
    let previous = (offset > 0).then(|| link(offset.saturating_sub(limit)));

    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = vec![
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::IdExhausted("x".into()), StatusCode::CONFLICT),
            (ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::Repository("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status(), status);
        }
    }

    #[test]
    fn test_storage_message_is_kept() {
        let response = ErrorResponse::from(ServiceError::Repository("connection reset".into()));
        assert_eq!(response.message, "connection reset");
        assert_eq!(response.error, "internal_error");
    }

    #[test]
    fn test_pagination_defaults_and_cap() {
        assert_eq!(PaginationParams::default().resolve(), (20, 0));
        let params = PaginationParams {
            limit: Some(500),
            offset: Some(40),
        };
        assert_eq!(params.resolve(), (100, 40));
    }

    #[test]
    fn test_pagination_links() {
        let (next, previous) = generate_pagination_links(45, 20, 20, "/api/v1/profiles", &[("search", "dela cruz")]);
        assert_eq!(next.as_deref(), Some("/api/v1/profiles?search=dela%20cruz&limit=20&offset=40"));
        assert_eq!(previous.as_deref(), Some("/api/v1/profiles?search=dela%20cruz&limit=20&offset=0"));

        let (next, previous) = generate_pagination_links(5, 20, 0, "/api/v1/profiles", &[]);
        assert!(next.is_none());
        assert!(previous.is_none());
    }

    #[test]
    fn test_pagination_links_at_max_offset() {
        let (next, previous) = generate_pagination_links(5, 20, usize::MAX, "/x", &[]);
        assert!(next.is_none());
        assert_eq!(previous, Some(format!("/x?limit=20&offset={}", usize::MAX - 20)));
    }
}
