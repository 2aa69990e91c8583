//! Error types for credential verification and token handling

use common::error::DatabaseError;
use thiserror::Error;

/// Errors produced by the credential and token service.
///
/// The first five variants are the authentication taxonomy. They stay
/// distinguishable for logging but collapse to two externally visible classes,
/// see [`AuthError::class`].
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token claims are malformed")]
    MalformedClaims,

    /// User storage failed; not an authentication decision
    #[error("user storage error: {0}")]
    Storage(#[from] DatabaseError),

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("token encoding error: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    /// `now + ttl` does not fit in a timestamp
    #[error("token lifetime out of range")]
    ExpiryOutOfRange,
}

/// What a caller outside the service is allowed to learn about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Login failed
    Unauthenticated,
    /// Bearer token rejected on a protected call
    Unauthorized,
    /// Infrastructure failure
    Internal,
}

impl AuthError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AuthError::UserNotFound | AuthError::WrongPassword => ErrorClass::Unauthenticated,
            AuthError::InvalidSignature | AuthError::Expired | AuthError::MalformedClaims => {
                ErrorClass::Unauthorized
            }
            AuthError::Storage(_)
            | AuthError::Hashing(_)
            | AuthError::Encoding(_)
            | AuthError::ExpiryOutOfRange => ErrorClass::Internal,
        }
    }
}

/// Type alias for Result with AuthError
pub type AuthResult<T> = Result<T, AuthError>;

/// Registration failures
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("invalid registration request: {0}")]
    Invalid(String),

    /// Username or email already taken
    #[error("{0} is already registered")]
    Conflict(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<DatabaseError> for RegistrationError {
    fn from(err: DatabaseError) -> Self {
        RegistrationError::Auth(AuthError::Storage(err))
    }
}
