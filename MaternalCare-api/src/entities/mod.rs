// Public API entities
pub mod common;

pub use common::{ErrorResponse, PaginatedResponse, PaginationParams};
