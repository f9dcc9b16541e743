mod short_url;

pub use short_url::{validate_http_url, validate_short_key, validate_target_url};
