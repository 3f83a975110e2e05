//! API middleware.

mod rate_limit;
mod session;

pub use rate_limit::rate_limit_auth_middleware;
pub use session::{require_session, CurrentUser};
