//! Security utilities shared by the HTTP layer and the login flow

pub mod headers;
pub mod timing;

pub use headers::with_api_security_headers;
pub use timing::{add_auth_delay, AuthTimer};
