//! Results of authentication and token verification

use serde::Serialize;

use crate::{error::AuthError, models::User};

/// Who a verified bearer token was issued to.
///
/// Protected endpoints must take the caller's identity from here and never
/// from request fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    #[serde(rename = "id")]
    pub user_id: i64,
}

/// Result of checking a username/password pair
#[derive(Debug)]
pub enum AuthenticationOutcome {
    Success(User),
    /// Carries [`AuthError::UserNotFound`] or [`AuthError::WrongPassword`]
    Failure(AuthError),
}

impl AuthenticationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthenticationOutcome::Success(_))
    }

    /// Collapse into a `Result`, keeping the internal failure reason
    pub fn into_result(self) -> Result<User, AuthError> {
        match self {
            AuthenticationOutcome::Success(user) => Ok(user),
            AuthenticationOutcome::Failure(reason) => Err(reason),
        }
    }
}
