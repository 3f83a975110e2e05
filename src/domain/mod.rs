//! Domain layer - Core business entities and logic
//!
//! Entities and value objects independent of HTTP and storage:
//! users and their password digests, sessions, and cart read models.

pub mod cart;
pub mod password;
pub mod session;
pub mod user;

pub use cart::{CartEntry, CartItem, Product};
pub use password::Password;
pub use session::{AuthStatus, LogoutOutcome, Session, SessionId, Unauthenticated};
pub use user::{NewUser, SessionUser, User, UserInfo};
