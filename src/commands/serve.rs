//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, SessionBackend};
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, MemorySessionStore, RedisSessionStore, SessionStore};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    tracing::info!("Starting server...");

    let db = Arc::new(Database::connect(&config).await?);

    let (sessions, cache) = session_backend(&config).await?;

    let app_state = AppState::from_config(db, cache, sessions, &config);
    let app = create_router(app_state);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Connection info feeds the rate limiter's client identifier
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Build the configured session store, plus the Redis cache when used.
async fn session_backend(
    config: &Config,
) -> AppResult<(Arc<dyn SessionStore>, Option<Arc<Cache>>)> {
    match config.session_backend {
        SessionBackend::Redis => {
            let cache = Cache::connect(config).await?;
            tracing::info!("Redis session store connected");
            let sessions: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(cache.clone()));
            Ok((sessions, Some(Arc::new(cache))))
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory sessions; rate limiting disabled");
            Ok((Arc::new(MemorySessionStore::new()), None))
        }
    }
}
