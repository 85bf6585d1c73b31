use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

use super::errors::RepositoryError;
use super::in_memory::MemoryDatabase;
use super::{ListQuery, Record, Repository};
use crate::database::DatabaseError;

/// Where records live: a Postgres pool, or process memory when no database is configured
#[derive(Debug, Clone)]
pub enum Storage {
    Postgres(PgPool),
    Memory(Arc<MemoryDatabase>),
}

impl Storage {
    /// Fresh in-memory storage
    pub fn memory() -> Self {
        Storage::Memory(Arc::new(MemoryDatabase::new()))
    }

    /// Whether records survive a restart
    pub fn is_persistent(&self) -> bool {
        matches!(self, Storage::Postgres(_))
    }

    /// Round-trip to the database, used by the health check
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Storage::Memory(_) => Ok(()),
        }
    }

    /// Short description for logs and the health check
    pub fn describe(&self) -> String {
        match self {
            Storage::Postgres(pool) => crate::database::get_connection_info(pool),
            Storage::Memory(_) => "in-memory storage".to_string(),
        }
    }
}

/// Escape LIKE wildcards in user input
fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append the WHERE clause shared by the count and select queries
fn push_filters<T: Record>(builder: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    let mut joiner = " WHERE ";

    if let (Some(column), Some(parent)) = (T::PARENT, query.parent) {
        builder.push(joiner).push(column).push(" = ").push_bind(parent);
        joiner = " AND ";
    }

    if let (Some(expression), Some(term)) = (T::SEARCH, query.search.as_deref()) {
        if !term.trim().is_empty() {
            builder
                .push(joiner)
                .push(expression)
                .push(" ILIKE ")
                .push_bind(like_pattern(term));
        }
    }
}

fn to_i64(value: usize, name: &str) -> Result<i64, RepositoryError> {
    i64::try_from(value).map_err(|_| RepositoryError::Validation(format!("{} is out of range", name)))
}

#[async_trait]
impl<T: Record> Repository<T> for Storage {
    async fn insert(&self, record: T) -> Result<T, RepositoryError> {
        debug!("Inserting into {}: {}={}", T::TABLE, T::KEY, record.key());

        match self {
            Storage::Postgres(pool) => Ok(record.pg_insert(pool).await?),
            Storage::Memory(db) => T::table(db).insert(record),
        }
    }

    async fn update(&self, record: T) -> Result<T, RepositoryError> {
        debug!("Updating {}: {}={}", T::TABLE, T::KEY, record.key());

        match self {
            Storage::Postgres(pool) => record
                .pg_update(pool)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(format!("{} {}", T::KEY, record.key()))),
            Storage::Memory(db) => T::table(db).update(record),
        }
    }

    async fn get(&self, key: i64) -> Result<Option<T>, RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                let sql = format!("SELECT * FROM {} WHERE {} = $1", T::TABLE, T::KEY);
                let row = sqlx::query_as::<_, T>(&sql)
                    .bind(key)
                    .fetch_optional(pool)
                    .await?;
                Ok(row)
            }
            Storage::Memory(db) => T::table(db).get(key),
        }
    }

    async fn exists(&self, key: i64) -> Result<bool, RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)", T::TABLE, T::KEY);
                let taken: bool = sqlx::query_scalar(&sql).bind(key).fetch_one(pool).await?;
                Ok(taken)
            }
            Storage::Memory(db) => T::table(db).exists(key),
        }
    }

    async fn max_key_between(&self, low: i64, high: i64) -> Result<Option<i64>, RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                let sql = format!(
                    "SELECT MAX({key}) FROM {table} WHERE {key} BETWEEN $1 AND $2",
                    key = T::KEY,
                    table = T::TABLE
                );
                let max: Option<i64> = sqlx::query_scalar(&sql)
                    .bind(low)
                    .bind(high)
                    .fetch_one(pool)
                    .await?;
                Ok(max)
            }
            Storage::Memory(db) => T::table(db).max_key_between(low, high),
        }
    }

    async fn list(&self, query: ListQuery) -> Result<(Vec<T>, usize), RepositoryError> {
        debug!("Listing {}: {:?}", T::TABLE, query);

        match self {
            Storage::Postgres(pool) => {
                let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
                push_filters::<T>(&mut count, &query);
                let (total,): (i64,) = count.build_query_as().fetch_one(pool).await?;

                let mut select = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", T::TABLE));
                push_filters::<T>(&mut select, &query);
                select.push(" ORDER BY ").push(T::ORDER_BY);
                if let Some(limit) = query.limit {
                    select.push(" LIMIT ").push_bind(to_i64(limit, "limit")?);
                }
                if let Some(offset) = query.offset {
                    select.push(" OFFSET ").push_bind(to_i64(offset, "offset")?);
                }

                let rows = select.build_query_as::<T>().fetch_all(pool).await?;
                let total = usize::try_from(total)
                    .map_err(|e| RepositoryError::Database(DatabaseError::QueryError(e.to_string())))?;
                Ok((rows, total))
            }
            Storage::Memory(db) => T::table(db).list(&query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("  maria "), "%maria%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[tokio::test]
    async fn test_memory_storage_pings() {
        let storage = Storage::memory();
        assert!(storage.ping().await.is_ok());
        assert!(!storage.is_persistent());
        assert_eq!(storage.describe(), "in-memory storage");
    }
}
