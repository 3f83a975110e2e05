//! Storefront API - session-authenticated storefront backend
//!
//! Accounts with salted password digests, server-side sessions referenced by
//! a `sessionId` cookie, and a session-guarded cart.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, sessions, passwords and cart read models
//! - **services**: Auth and cart use cases
//! - **infra**: PostgreSQL (SeaORM), Redis and session storage
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response envelopes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Session, SessionId, User};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, SessionStore};
