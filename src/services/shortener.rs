// src/services/shortener.rs - Business logic
use std::sync::Arc;

use log::{debug, info, warn};
use validator::Validate;

use crate::errors::AppError;
use crate::models::{CreateShortUrlDto, ShortUrlResponseDto, ShortenForm, UrlRecord};
use crate::repositories::UrlStore;
use crate::services::RateLimiter;
use crate::validations::{validate_http_url, validate_short_key};

type Result<T> = std::result::Result<T, AppError>;

/// Shared state handed to every worker: the URL table plus the redirect limiter
pub struct ShortenerService<S: UrlStore> {
    store: Arc<S>,
    limiter: Arc<RateLimiter>,
    base_url: String,
    require_http_scheme: bool,
}

impl<S: UrlStore> ShortenerService<S> {
    pub fn new(store: Arc<S>, limiter: Arc<RateLimiter>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            limiter,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            require_http_scheme: false,
        }
    }

    /// Only accept absolute http(s) URLs when shortening
    pub fn require_http_scheme(mut self, require: bool) -> Self {
        self.require_http_scheme = require;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shortens the URL submitted through the HTML form
    pub fn shorten_form(&self, form: ShortenForm) -> Result<ShortUrlResponseDto> {
        form.validate()?;
        self.shorten(&form.url)
    }

    /// Shortens the URL submitted through the JSON API
    pub fn shorten_dto(&self, dto: CreateShortUrlDto) -> Result<ShortUrlResponseDto> {
        dto.validate()?;
        self.shorten(&dto.url)
    }

    /// Stores `raw_url` under a new key and returns its short form
    pub fn shorten(&self, raw_url: &str) -> Result<ShortUrlResponseDto> {
        let target = raw_url.trim();
        if target.is_empty() {
            return Err(AppError::Validation("URL parameter is missing".to_string()));
        }

        if self.require_http_scheme {
            validate_http_url(target).map_err(|e| {
                AppError::Validation(
                    e.message
                        .map(|m| m.into_owned())
                        .unwrap_or_else(|| "Invalid URL".to_string()),
                )
            })?;
        }

        let record = self.store.put(target)?;
        info!("Shortened '{}' to key '{}'", record.target, record.key);

        Ok(ShortUrlResponseDto::from_record(record, &self.base_url))
    }

    /// Redirect flow: admit through the limiter first, then look the key up
    pub fn resolve(&self, key: &str) -> Result<UrlRecord> {
        let decision = self.limiter.check();
        if !decision.allowed {
            warn!("Redirect for '{}' rejected by rate limiter", key);
            return Err(AppError::RateLimited {
                retry_after: decision.retry_after,
            });
        }
        debug!("Redirect for '{}' admitted, {} left in window", key, decision.remaining);

        self.lookup(key)
    }

    fn lookup(&self, key: &str) -> Result<UrlRecord> {
        validate_short_key(key)
            .map_err(|_| AppError::Validation("Short key is missing".to_string()))?;

        self.store
            .get(key)?
            .ok_or_else(|| AppError::NotFound(format!("Short URL '{}' not found", key)))
    }

    pub fn stored_urls(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }
}
