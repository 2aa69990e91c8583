//! Common library for the todo services
//!
//! This crate provides shared functionality used by the auth and api
//! services: PostgreSQL connectivity, schema migrations and storage errors.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
