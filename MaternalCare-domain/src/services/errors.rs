use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use maternal_care_data::repository::RepositoryError;

/// Errors returned by every domain service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record (or its key) already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// All identifier attempts for the year were taken
    #[error("Identifier space exhausted: {0}")]
    IdExhausted(String),

    /// Missing or bad credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        map_repo_error(err)
    }
}

/// Map repository errors to service errors
pub fn map_repo_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
        RepositoryError::Validation(msg) => ServiceError::Validation(msg),
        RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
        other => {
            error!("Storage error: {}", other);
            ServiceError::Repository(other.to_string())
        }
    }
}

/// Flatten `validator` errors into one message, fields in name order
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| {
                    if let Some(msg) = &err.message {
                        msg.to_string()
                    } else {
                        format!("Invalid {}", field)
                    }
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Run `validator` checks and turn failures into a `Validation` error
pub fn validate_request<T: validator::Validate>(request: &T) -> Result<(), ServiceError> {
    request
        .validate()
        .map_err(|errors| ServiceError::Validation(validation_message(&errors)))
}
