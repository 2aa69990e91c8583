//! Startup configuration for the auth service
//!
//! Everything here is read once from the environment at process start and
//! then passed explicitly to the components that need it. A missing or weak
//! signing key aborts startup.

use chrono::Duration;
use std::{env, net::SocketAddr, path::PathBuf};
use thiserror::Error;

/// Shortest accepted HS256 signing key, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime when a caller does not pass one (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: i64 = 15 * 60;

/// Lifetime of tokens handed out by the login endpoint (20 minutes)
pub const DEFAULT_LOGIN_TOKEN_EXPIRY_SECS: i64 = 20 * 60;

/// Longest configurable token lifetime (one year)
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("neither JWT_SECRET nor JWT_SECRET_FILE is set")]
    MissingSecret,

    #[error("signing key must be at least 32 bytes, got {0}")]
    SecretTooShort(usize),

    #[error("failed to read signing key file {}: {source}", path.display())]
    SecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} must be between 1 and 31536000 seconds, got {value:?}")]
    InvalidExpiry { name: &'static str, value: String },

    #[error("{name} is not a valid socket address: {value:?}")]
    InvalidAddress { name: &'static str, value: String },
}

/// Signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Symmetric HS256 key
    pub secret: Vec<u8>,
    /// TTL applied when `issue` gets no explicit one
    pub access_token_expiry: Duration,
    /// TTL applied by the login endpoint
    pub login_token_expiry: Duration,
}

// The key must never end up in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("login_token_expiry", &self.login_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Build a config from a key, with the default lifetimes
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort(secret.len()));
        }

        Ok(Self {
            secret,
            access_token_expiry: Duration::seconds(DEFAULT_ACCESS_TOKEN_EXPIRY_SECS),
            login_token_expiry: Duration::seconds(DEFAULT_LOGIN_TOKEN_EXPIRY_SECS),
        })
    }

    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET_FILE`: path to a file holding the signing key (e.g. a mounted secret)
    /// - `JWT_SECRET`: the signing key itself, used when `JWT_SECRET_FILE` is unset
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: default token expiry in seconds (default: 900)
    /// - `JWT_LOGIN_TOKEN_EXPIRY`: login token expiry in seconds (default: 1200)
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = match env::var("JWT_SECRET_FILE") {
            Ok(path) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::SecretFile { path, source })?
                    .trim_end()
                    .to_string()
            }
            Err(_) => env::var("JWT_SECRET").map_err(|_| ConfigError::MissingSecret)?,
        };

        let mut config = Self::new(secret)?;
        config.access_token_expiry = expiry_from_env(
            "JWT_ACCESS_TOKEN_EXPIRY",
            DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
        )?;
        config.login_token_expiry =
            expiry_from_env("JWT_LOGIN_TOKEN_EXPIRY", DEFAULT_LOGIN_TOKEN_EXPIRY_SECS)?;

        Ok(config)
    }
}

fn expiry_from_env(name: &'static str, default: i64) -> Result<Duration, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(Duration::seconds(default));
    };

    match value.trim().parse::<i64>() {
        Ok(secs) if (1..=MAX_TOKEN_EXPIRY_SECS).contains(&secs) => Ok(Duration::seconds(secs)),
        _ => Err(ConfigError::InvalidExpiry { name, value }),
    }
}

/// Read a listen address, falling back to `default`
pub fn bind_addr_from_env(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::InvalidAddress { name, value })
}
