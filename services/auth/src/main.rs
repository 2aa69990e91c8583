use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{
    AuthService, TokenService,
    config::{JwtConfig, bind_addr_from_env},
    repositories::UserRepository,
    routes,
};
use common::database::{self, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting authentication service");

    // A bad signing key must stop the process before it serves anything
    let jwt_config = JwtConfig::from_env()?;
    let bind_addr = bind_addr_from_env("AUTH_BIND_ADDR", "0.0.0.0:3000")?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    database::run_migrations(&pool).await?;

    let service = AuthService::new(
        Arc::new(UserRepository::new(pool)),
        TokenService::new(&jwt_config),
        jwt_config.login_token_expiry,
    );

    let app = routes::create_router(service);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Authentication service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
