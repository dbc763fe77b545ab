pub mod auth;
pub mod request_id;

pub use auth::{AuthClaimsExt, Authenticated, JwtAuthMiddleware};
pub use request_id::{RequestId, RequestIdExt, RequestIdMiddleware};
