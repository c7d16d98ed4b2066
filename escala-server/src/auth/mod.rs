//! Authentication: JWT tokens, request extractors and login rate limiting

pub mod extractor;
pub mod jwt;
pub mod rate_limit;

pub use extractor::{AdminUser, CurrentUser};
pub use jwt::{Claims, JwtError, JwtService};
pub use rate_limit::RateLimiter;
