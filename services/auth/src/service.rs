//! Credential verification, login and registration
//!
//! Ties the user store, the password hasher and the token service together.
//! Password hashing runs on the blocking pool; the store lookup is the only
//! other suspension point. Nothing here retries.

use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult, RegistrationError},
    jwt::TokenService,
    models::{AuthenticationOutcome, CreateUser, Identity, NewUser, User},
    password,
    repositories::UserStore,
    validation,
};

/// Credential and token service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    login_ttl: Duration,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, login_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            login_ttl,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords both come back as
    /// [`AuthenticationOutcome::Failure`]; only storage problems are errors.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<AuthenticationOutcome> {
        let user = self.users.find_by_username(username).await?;
        let password = password.to_string();

        let Some(user) = user else {
            run_blocking(move || password::verify_against_dummy(&password)).await?;
            return Ok(AuthenticationOutcome::Failure(AuthError::UserNotFound));
        };

        let hash = user.password_hash.clone();
        let matches = run_blocking(move || password::verify_password(&password, &hash)).await?;

        if matches {
            Ok(AuthenticationOutcome::Success(user))
        } else {
            Ok(AuthenticationOutcome::Failure(AuthError::WrongPassword))
        }
    }

    /// Authenticate and, on success, issue a token with the login TTL
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<String> {
        info!("Login attempt for user: {}", username);

        let user = match self.authenticate(username, password).await?.into_result() {
            Ok(user) => user,
            Err(reason) => {
                warn!("Login failed for user {}: {}", username, reason);
                return Err(reason);
            }
        };

        self.tokens.issue(&user.username, user.id, Some(self.login_ttl))
    }

    /// Verify a bearer token
    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        self.tokens.verify(token)
    }

    /// Register a new account
    pub async fn register(&self, request: CreateUser) -> Result<User, RegistrationError> {
        validation::validate_registration(&request).map_err(RegistrationError::Invalid)?;

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(RegistrationError::Conflict("username"));
        }
        if let Some(email) = request.email.as_deref() {
            if self.users.find_by_email(email).await?.is_some() {
                return Err(RegistrationError::Conflict("email"));
            }
        }

        let plaintext = request.password;
        let password_hash = run_blocking(move || password::hash_password(&plaintext)).await??;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash,
        };

        // The pre-checks race with concurrent registrations; the UNIQUE
        // constraints have the final word.
        let user = self.users.insert(new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                RegistrationError::Conflict("username or email")
            } else {
                RegistrationError::from(e)
            }
        })?;

        info!("Registered user {} with id {}", user.username, user.id);
        Ok(user)
    }
}

async fn run_blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Hashing(format!("hashing task failed: {}", e)))
}
