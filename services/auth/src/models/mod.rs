//! Authentication service models

pub mod identity;
pub mod user;

// Re-export for convenience
pub use identity::{AuthenticationOutcome, Identity};
pub use user::{CreateUser, LoginCredentials, NewUser, PublicUser, User};
