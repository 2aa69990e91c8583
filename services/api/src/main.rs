use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{repositories::TodoRepository, routes, state::AppState};
use auth::{
    TokenService,
    config::{JwtConfig, bind_addr_from_env},
};
use common::database::{self, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting API service");

    // Same key as the auth service, otherwise no token verifies
    let jwt_config = JwtConfig::from_env()?;
    let bind_addr = bind_addr_from_env("API_BIND_ADDR", "0.0.0.0:3001")?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    database::run_migrations(&pool).await?;

    let app_state = AppState {
        todo_store: Arc::new(TodoRepository::new(pool)),
        tokens: TokenService::new(&jwt_config),
    };

    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
