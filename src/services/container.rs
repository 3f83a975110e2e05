//! Service Container - Centralized service access.
//!
//! Holds the service trait objects handed to the HTTP layer.

use std::sync::Arc;

use super::{AuthService, CartService};
use crate::config::Config;
use crate::infra::{CartStore, SessionStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get cart service
    fn carts(&self) -> Arc<dyn CartService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    cart_service: Arc<dyn CartService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(auth_service: Arc<dyn AuthService>, cart_service: Arc<dyn CartService>) -> Self {
        Self {
            auth_service,
            cart_service,
        }
    }

    /// Create service container from database connection, session store and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        sessions: Arc<dyn SessionStore>,
        config: &Config,
    ) -> Self {
        use super::{Authenticator, CartManager};

        let users = Arc::new(UserStore::new(db.clone()));
        let carts = Arc::new(CartStore::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(
                users,
                sessions,
                config.session_ttl_seconds,
            )),
            cart_service: Arc::new(CartManager::new(carts)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }
}
