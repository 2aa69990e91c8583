//! Todo list API
//!
//! Per-user todo CRUD behind bearer token authentication. Tokens are issued
//! by the auth service and verified here with the same signing key.

pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
