//! Custom request extractors.

mod session_cookie;
mod validated_json;

pub use session_cookie::{removal_cookie, session_cookie, SessionCookie};
pub use validated_json::ValidatedJson;
