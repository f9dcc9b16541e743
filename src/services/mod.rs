mod rate_limiter;
mod shortener;

pub use rate_limiter::RateLimiter;
pub use shortener::ShortenerService;
