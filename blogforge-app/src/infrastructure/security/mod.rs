mod cost_tracker;
mod rate_limiter;
mod request_validator;

pub use cost_tracker::{CostLimitError, CostTracker};
pub use rate_limiter::{RateLimitError, RateLimiter};
pub use request_validator::RequestValidator;
