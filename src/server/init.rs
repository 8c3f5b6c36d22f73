/**
 * Server Initialization
 *
 * Wires configuration, the store, and the router together. With a
 * `DATABASE_URL` the server runs against PostgreSQL (applying pending
 * migrations on startup); without one it falls back to the in-memory
 * store, which is enough for local development against seeded data.
 */

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use crate::routes::router::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::ContentStore;

async fn connect_store(config: &AppConfig) -> Arc<dyn ContentStore> {
    if let Some(database_url) = &config.database_url {
        match PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
                    tracing::error!("Migration failed: {}", e);
                } else {
                    tracing::info!("Database connected, migrations up to date");
                }
                return Arc::new(PgStore::new(pool));
            }
            Err(e) => {
                tracing::error!("Database connection failed: {}", e);
            }
        }
    }

    tracing::warn!("No database available, using in-memory store");
    Arc::new(MemoryStore::new())
}

/// Build the application with its full middleware and route stack
pub async fn create_app(config: AppConfig) -> Router {
    tracing::info!(
        "Addressing mode: {:?}, root domain: '{}'",
        config.addressing_mode,
        config.root_domain
    );

    let store = connect_store(&config).await;
    let state = AppState::new(config, store);

    create_router(state)
}
