pub mod auth;
pub mod cors;
pub mod response;

pub use auth::{authenticate, extract_access_token, Principal};
pub use response::{ApiResponse, ApiResult};
