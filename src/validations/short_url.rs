use url::Url;
use validator::ValidationError;

/// Rejects URLs that are empty once surrounding whitespace is trimmed
pub fn validate_target_url(url_str: &str) -> Result<(), ValidationError> {
    if url_str.trim().is_empty() {
        let mut err = ValidationError::new("url_missing");
        err.message = Some("URL parameter is missing".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a URL string is absolute and uses http/https
pub fn validate_http_url(url_str: &str) -> Result<(), ValidationError> {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.host().is_none() {
                let mut err = ValidationError::new("url_host");
                err.message = Some("URL must have a host".into());
                return Err(err);
            }

            if url.scheme() != "http" && url.scheme() != "https" {
                let mut err = ValidationError::new("url_scheme");
                err.message = Some("URL scheme must be http or https".into());
                return Err(err);
            }

            Ok(())
        }
        Err(_) => {
            let mut err = ValidationError::new("url_format");
            err.message = Some("Invalid URL format".into());
            Err(err)
        }
    }
}

/// Rejects an empty key segment
pub fn validate_short_key(key: &str) -> Result<(), ValidationError> {
    if key.trim().is_empty() {
        let mut err = ValidationError::new("key_missing");
        err.message = Some("Short key is missing".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_target_url() {
        assert!(validate_target_url("https://example.com").is_ok());
        assert!(validate_target_url("  not-a-url-but-non-empty ").is_ok());

        let err = validate_target_url("   ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("URL parameter is missing"));
        assert!(validate_target_url("").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://example.com").is_ok());
        assert!(validate_http_url("http://example.com/path?query=value").is_ok());

        assert!(validate_http_url("not-a-url").is_err());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_validate_short_key() {
        assert!(validate_short_key("aB3xYz").is_ok());
        assert!(validate_short_key("").is_err());
        assert!(validate_short_key(" ").is_err());
    }
}
