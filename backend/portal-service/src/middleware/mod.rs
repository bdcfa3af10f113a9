pub mod auth;
pub mod rate_limit;

pub use auth::{AuthUser, JwtAuthMiddleware};
pub use rate_limit::{RateLimitMiddleware, RateLimiter};
