//! Shared response types.

mod response;

pub use response::{ApiResponse, MessageResponse};
