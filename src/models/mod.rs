mod short_url;

pub use short_url::{CreateShortUrlDto, ShortKey, ShortUrlResponseDto, ShortenForm, UrlRecord};
