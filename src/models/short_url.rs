// src/models/short_url.rs - Pure data structures
use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validations::validate_target_url;

/// Random alphanumeric identifier that maps to a stored URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortKey(String);

impl ShortKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ShortKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ShortKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl AsRef<str> for ShortKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ShortKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored mapping from short key to the original URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The generated short key
    pub key: ShortKey,

    /// The original, long URL
    pub target: String,

    /// When the mapping was created
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    pub fn new(key: ShortKey, target: String) -> Self {
        Self {
            key,
            target,
            created_at: Utc::now(),
        }
    }
}

/// Form body posted by the index page
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ShortenForm {
    #[serde(default)]
    #[validate(custom(function = "validate_target_url"))]
    pub url: String,
}

impl ShortenForm {
    /// Takes `url` from the query string when the body left it blank
    pub fn or_query(self, query: Option<ShortenForm>) -> Self {
        match query {
            Some(query) if self.url.trim().is_empty() => query,
            _ => self,
        }
    }
}

/// JSON body for the API variant of shorten
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct CreateShortUrlDto {
    #[serde(default)]
    #[validate(custom(function = "validate_target_url"))]
    pub url: String,
}

/// Details of a shortened URL returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortUrlResponseDto {
    pub key: ShortKey,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortUrlResponseDto {
    pub fn from_record(record: UrlRecord, base_url: &str) -> Self {
        let short_url = short_url_for(base_url, &record.key);
        Self {
            key: record.key,
            short_url,
            original_url: record.target,
            created_at: record.created_at,
        }
    }
}

/// Builds `<base>/short/<key>`
pub fn short_url_for(base_url: &str, key: &ShortKey) -> String {
    format!("{}/short/{}", base_url.trim_end_matches('/'), key)
}
