// Repository module structure
pub mod errors;
mod education;
mod health;
mod in_memory;
mod profile;
mod storage;
mod user;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::FromRow;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::{MemoryDatabase, MemoryTable};
pub use storage::Storage;
pub use user::UserRepository;

/// A table row addressed by a `BIGINT` key
///
/// Everything the generic repository needs to know about a table: its name,
/// key column, optional owner column and how lists are ordered. Inserts and
/// updates stay per table because their column lists differ.
#[async_trait]
pub trait Record: Clone + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, PgRow> {
    /// Table name
    const TABLE: &'static str;

    /// Primary key column
    const KEY: &'static str;

    /// Column holding the owning record's key, if any
    const PARENT: Option<&'static str>;

    /// SQL text expression matched by name searches
    const SEARCH: Option<&'static str> = None;

    /// ORDER BY clause for list results
    const ORDER_BY: &'static str;

    fn key(&self) -> i64;

    fn parent_key(&self) -> Option<i64>;

    /// Text matched by name searches in the in-memory store
    fn search_text(&self) -> Option<String> {
        None
    }

    /// In-memory equivalent of `ORDER_BY`
    fn list_order(a: &Self, b: &Self) -> std::cmp::Ordering;

    /// The in-memory table holding this record type
    fn table(db: &MemoryDatabase) -> &MemoryTable<Self>;

    /// `INSERT ... RETURNING *`
    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error>;

    /// `UPDATE ... RETURNING *`, `None` when the key does not exist
    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error>;
}

/// Filters and pagination for list queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Only rows owned by this key
    pub parent: Option<i64>,
    /// Case-insensitive substring of the searchable text
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListQuery {
    /// Every row owned by `parent`
    pub fn children_of(parent: i64) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }
}

/// Insert / update / select over one table
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Insert a new row; a taken key is a `Conflict`
    async fn insert(&self, record: T) -> Result<T, RepositoryError>;

    /// Replace an existing row; a missing key is `NotFound`
    async fn update(&self, record: T) -> Result<T, RepositoryError>;

    /// Get a row by key
    async fn get(&self, key: i64) -> Result<Option<T>, RepositoryError>;

    /// Whether a key is already taken
    async fn exists(&self, key: i64) -> Result<bool, RepositoryError>;

    /// Largest key within `low..=high`
    async fn max_key_between(&self, low: i64, high: i64) -> Result<Option<i64>, RepositoryError>;

    /// One page of rows plus the total number of matching rows
    async fn list(&self, query: ListQuery) -> Result<(Vec<T>, usize), RepositoryError>;
}
