//! Infrastructure layer - External systems integration
//!
//! - PostgreSQL connection, migrations and repositories (SeaORM)
//! - Redis cache
//! - Session storage

pub mod cache;
pub mod db;
pub mod repositories;
pub mod session_store;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{CartRepository, CartStore, UserRepository, UserStore};
pub use session_store::{MemorySessionStore, RedisSessionStore, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCartRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use session_store::MockSessionStore;
