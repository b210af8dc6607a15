//! Authentication service
//!
//! Registration, login, token authorization and account seeding.
//! HTTP handlers and the CLI are thin wrappers that delegate here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    DomainError, DomainResult, FieldError, NewUser, RepositoryProvider, User,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MAX_USERNAME_LEN: usize = 50;

/// Bearer token issued after a successful login
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Result of seeding an account
#[derive(Debug, Clone)]
pub enum SeedOutcome {
    Created(User),
    AlreadyExists,
}

pub struct AuthService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, username: &str, password: &str) -> DomainResult<User> {
        let username = username.trim();

        let mut fields = Vec::new();
        if username.is_empty() {
            fields.push(FieldError::required("username"));
        } else if username.chars().count() > MAX_USERNAME_LEN {
            fields.push(FieldError::new(
                "username",
                format!("must be at most {} characters", MAX_USERNAME_LEN),
            ));
        }
        if password.is_empty() {
            fields.push(FieldError::required("password"));
        }
        if !fields.is_empty() {
            return Err(DomainError::InvalidFields(fields));
        }

        if self.repos.users().find_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already registered".into()));
        }

        let user = self.create(username, password).await.map_err(|e| match e {
            // Lost a race with a concurrent registration
            DomainError::Conflict(_) => DomainError::Conflict("Username already registered".into()),
            other => other,
        })?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    async fn create(&self, username: &str, password: &str) -> DomainResult<User> {
        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .create(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AccessToken> {
        let Some(user) = self.repos.users().find_by_username(username.trim()).await? else {
            return Err(DomainError::Unauthorized("Incorrect username or password".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
            warn!(username = %user.username, error = %e, "Stored password hash is unreadable");
            false
        });
        if !valid {
            return Err(DomainError::Unauthorized("Incorrect username or password".into()));
        }

        let access_token = create_token(&user.username, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        info!(username = %user.username, "User logged in");
        Ok(AccessToken {
            access_token,
            token_type: "bearer",
            expires_in: self.jwt_config.expiration_minutes * 60,
        })
    }

    /// Resolve a bearer token to its user. Any decode failure or unknown
    /// subject is `Unauthorized`.
    pub async fn authorize(&self, token: &str) -> DomainResult<User> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Could not validate credentials".into()))?;

        self.repos
            .users()
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Could not validate credentials".into()))
    }

    // ── Seeding ─────────────────────────────────────────────────

    /// Create an account unless the username is taken.
    pub async fn seed_user(&self, username: &str, password: &str) -> DomainResult<SeedOutcome> {
        if self.repos.users().find_by_username(username).await?.is_some() {
            return Ok(SeedOutcome::AlreadyExists);
        }
        let user = self.create(username, password).await?;
        info!(username = %user.username, "Seeded user account");
        Ok(SeedOutcome::Created(user))
    }

    /// Seed the admin account when no users exist yet.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }
        match self.seed_user(username, password).await? {
            SeedOutcome::Created(user) => Ok(Some(user)),
            SeedOutcome::AlreadyExists => Ok(None),
        }
    }
}
