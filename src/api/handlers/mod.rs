//! HTTP request handlers.

pub mod auth_handler;
pub mod cart_handler;

pub use auth_handler::{auth_routes, session_routes};
pub use cart_handler::cart_routes;
