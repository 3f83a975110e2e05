//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, SessionStore};
use crate::services::{AuthService, CartService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Cart service
    pub cart_service: Arc<dyn CartService>,
    /// Redis cache; rate limiting is off without it
    pub cache: Option<Arc<Cache>>,
    /// Database handle, used by the health check
    pub database: Option<Arc<Database>>,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// Allowed CORS origin (credentials enabled)
    pub cors_origin: Option<String>,
    /// Identify clients by forwarded headers (only behind a trusted proxy)
    pub trust_proxy_headers: bool,
}

impl AppState {
    /// Create application state from live infrastructure and config.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        sessions: Arc<dyn SessionStore>,
        config: &Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), sessions, config);

        Self {
            auth_service: container.auth(),
            cart_service: container.carts(),
            cache,
            database: Some(database),
            cookie_secure: config.cookie_secure,
            cors_origin: Some(config.cors_origin.clone()),
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }

    /// Create application state with manually injected services.
    ///
    /// No cache, no database, no CORS; suited to tests.
    pub fn new(auth_service: Arc<dyn AuthService>, cart_service: Arc<dyn CartService>) -> Self {
        Self {
            auth_service,
            cart_service,
            cache: None,
            database: None,
            cookie_secure: false,
            cors_origin: None,
            trust_proxy_headers: false,
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}
