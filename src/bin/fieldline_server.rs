//! Runs the Fieldline HTTP server.
//!
//! Configuration comes from the environment (and `.env` when present):
//!
//! ```text
//! FIELDLINE_BIND_ADDR=0.0.0.0:8000
//! DATABASE_URL=postgres://fieldline@localhost/fieldline
//! LOG_LEVEL=info
//! ```
//!
//! Without `DATABASE_URL` the server keeps all state in memory, which suits
//! local development and demos but loses everything on exit.

use fieldline::api::{AppState, Repositories, create_router};
use fieldline::config::AppConfig;
use fieldline::persistence::postgres::build_pool;
use fieldline::telemetry::init_tracing;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_level);

    let repositories = match config.database_url.as_deref() {
        Some(url) => {
            let pool = build_pool(url, config.pool_size, config.persistence.timeout())?;
            tracing::info!(pool_size = config.pool_size, "connected to PostgreSQL");
            Repositories::postgres(&pool)
        }
        None => {
            tracing::warn!("DATABASE_URL is unset; using in-memory storage");
            Repositories::in_memory()
        }
    };

    let app_state = Arc::new(AppState::new(repositories, config.persistence));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(address = %config.bind_addr, "fieldline listening");
    axum::serve(listener, app).await?;
    Ok(())
}
