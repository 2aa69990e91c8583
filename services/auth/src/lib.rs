//! Credential and token service for the todo application
//!
//! Verifies usernames and passwords against Argon2 hashes, issues HS256
//! bearer tokens and verifies them on protected calls. The auth binary serves
//! registration and login over HTTP; other services reuse [`middleware`] to
//! guard their routes.

pub mod clock;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod validation;

pub use error::{AuthError, AuthResult, ErrorClass};
pub use jwt::TokenService;
pub use models::Identity;
pub use service::AuthService;
