use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use maternal_care_data::models::{Role, User};
use maternal_care_data::repository::UserRepository;

use super::errors::{validate_request, ServiceError};
use crate::auth::logging::{log_failed_login, log_registration, log_successful_login};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::TokenSettings;
use crate::entities::conversions::required;
use crate::entities::{CreateUserRequest, LoginRequest, LoginResponse, SignupRequest, UserSummary};

/// Trait for account management and login
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Public sign-up; the account is always a worker
    async fn signup(&self, request: SignupRequest) -> Result<UserSummary, ServiceError>;

    /// Admin-created account with any role
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserSummary, ServiceError>;

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ServiceError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError>;

    async fn get_user(&self, id: Uuid) -> Result<UserSummary, ServiceError>;

    /// Create the bootstrap admin unless an account with that email exists
    ///
    /// Returns whether an account was created.
    async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, ServiceError>;
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenSettings>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenSettings>) -> Self {
        Self { users, tokens }
    }

    async fn register(&self, email: &str, full_name: &str, password: &str, role: Role) -> Result<User, ServiceError> {
        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(format!("email {} is already registered", email)));
        }

        let password_hash = hash_password(password).map_err(|e| ServiceError::Internal(e.to_string()))?;
        let user = User {
            id: Uuid::new_v4(),
            email,
            full_name: required("Full name", full_name)?,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        let stored = self.users.insert_user(user).await?;
        log_registration(&stored.id.to_string(), stored.role.as_str());
        Ok(stored)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn signup(&self, request: SignupRequest) -> Result<UserSummary, ServiceError> {
        validate_request(&request)?;
        let user = self
            .register(&request.email, &request.full_name, &request.password, Role::Worker)
            .await?;
        info!("Worker account {} signed up", user.id);
        Ok(user.into())
    }

    async fn create_user(&self, request: CreateUserRequest) -> Result<UserSummary, ServiceError> {
        validate_request(&request)?;
        let user = self
            .register(&request.email, &request.full_name, &request.password, request.role)
            .await?;
        info!("{} account {} created by an admin", user.role, user.id);
        Ok(user.into())
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let email = normalize_email(&request.email);
        let invalid = || ServiceError::Unauthorized("Invalid email or password".to_string());

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                log_failed_login(&email, "Unknown email");
                return Err(invalid());
            }
        };

        if !verify_password(&request.password, &user.password_hash) {
            log_failed_login(&email, "Wrong password");
            return Err(invalid());
        }

        let access_token = self
            .tokens
            .generate_token(&user)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        log_successful_login(&user.id.to_string());

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.expires_in(),
            user: user.into(),
        })
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        let users = self.users.list_users().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    async fn get_user(&self, id: Uuid) -> Result<UserSummary, ServiceError> {
        self.users
            .find_user(id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| ServiceError::NotFound(format!("User with ID {} not found", id)))
    }

    async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, ServiceError> {
        if self.users.find_by_email(&normalize_email(email)).await?.is_some() {
            return Ok(false);
        }

        let admin = self.register(email, "Administrator", password, Role::Admin).await?;
        info!("Bootstrap admin {} created", admin.email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maternal_care_data::repository::Storage;

    fn service() -> UserService {
        UserService::new(
            Arc::new(Storage::memory()),
            Arc::new(TokenSettings::new("user-service-secret", "test-issuer", 60)),
        )
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            full_name: "Rosa Reyes".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_creates_worker() {
        let service = service();
        let user = service.signup(signup("Rosa@Example.org")).await.unwrap();

        assert_eq!(user.role, Role::Worker);
        assert_eq!(user.email, "rosa@example.org");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service();
        service.signup(signup("rosa@example.org")).await.unwrap();

        let result = service.signup(signup("ROSA@example.org")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let mut request = signup("rosa@example.org");
        request.password = "short".to_string();

        let result = service().signup(request).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_role() {
        let service = service();
        service
            .create_user(CreateUserRequest {
                email: "admin@example.org".to_string(),
                full_name: "Program Admin".to_string(),
                password: "admin-password".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let response = service
            .login(LoginRequest {
                email: "admin@example.org".to_string(),
                password: "admin-password".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        let claims = service.tokens.validate_token(&response.access_token).unwrap();
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let service = service();
        service.signup(signup("rosa@example.org")).await.unwrap();

        let result = service
            .login(LoginRequest {
                email: "rosa@example.org".to_string(),
                password: "wrong-horse".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));

        let unknown = service
            .login(LoginRequest {
                email: "nobody@example.org".to_string(),
                password: "correct-horse".to_string(),
            })
            .await;
        assert!(matches!(unknown, Err(ServiceError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_ensure_admin_only_once() {
        let service = service();
        assert!(service.ensure_admin("admin@example.org", "bootstrap-pass").await.unwrap());
        assert!(!service.ensure_admin("Admin@example.org", "bootstrap-pass").await.unwrap());

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(service.get_user(users[0].id).await.unwrap().email, "admin@example.org");
    }
}
