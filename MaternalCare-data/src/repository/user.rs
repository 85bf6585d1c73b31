use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::errors::RepositoryError;
use super::storage::Storage;
use crate::models::User;

/// Account storage, keyed by UUID and unique by email
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account; a taken email is a `Conflict`
    async fn insert_user(&self, user: User) -> Result<User, RepositoryError>;

    /// Look up an account by its lower-cased email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// All accounts, oldest first
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
}

#[async_trait]
impl UserRepository for Storage {
    async fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        debug!("Storing user account: id={}", user.id);

        match self {
            Storage::Postgres(pool) => {
                let stored = sqlx::query_as::<_, User>(
                    "INSERT INTO users (id, email, full_name, password_hash, role, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING *",
                )
                .bind(user.id)
                .bind(&user.email)
                .bind(&user.full_name)
                .bind(&user.password_hash)
                .bind(user.role.as_str())
                .bind(user.created_at)
                .fetch_one(pool)
                .await?;
                Ok(stored)
            }
            Storage::Memory(db) => {
                let mut users = db.users.lock()?;
                if users.values().any(|existing| existing.email == user.email) {
                    return Err(RepositoryError::Conflict(format!("email {} is already registered", user.email)));
                }
                if users.contains_key(&user.id) {
                    return Err(RepositoryError::Conflict(format!("user {} already exists", user.id)));
                }
                users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                    .bind(email)
                    .fetch_optional(pool)
                    .await?;
                Ok(user)
            }
            Storage::Memory(db) => {
                let users = db.users.lock()?;
                Ok(users.values().find(|user| user.email == email).cloned())
            }
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                Ok(user)
            }
            Storage::Memory(db) => {
                let users = db.users.lock()?;
                Ok(users.get(&id).cloned())
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        match self {
            Storage::Postgres(pool) => {
                let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
                    .fetch_all(pool)
                    .await?;
                Ok(users)
            }
            Storage::Memory(db) => {
                let users = db.users.lock()?;
                let mut all: Vec<User> = users.values().cloned().collect();
                all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                Ok(all)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: "Ana Reyes".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Worker,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_users_unique_by_email() {
        let storage = Storage::memory();
        storage.insert_user(user("ana@example.org")).await.unwrap();

        let duplicate = storage.insert_user(user("ana@example.org")).await;
        assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

        let found = storage.find_by_email("ana@example.org").await.unwrap();
        assert!(found.is_some());
        assert_eq!(storage.list_users().await.unwrap().len(), 1);
    }
}
