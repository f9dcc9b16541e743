use std::io::Error as IoError;
use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use thiserror::Error;

pub mod config;
pub mod store;

pub use config::ConfigError;
pub use store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    // Request-level errors
    #[error("{0}")]
    Validation(String),
    #[error("Invalid request method")]
    MethodNotAllowed,
    #[error("{0}")]
    NotFound(String),
    #[error("Rate limit exceeded, try again later")]
    RateLimited { retry_after: Duration },
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single line
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| {
                e.message
                    .clone()
                    .map(|m| m.into_owned())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation(message)
    }
}

impl AppError {
    /// Process exit status for errors that abort startup; request-level
    /// errors never reach `main` and map to `None`
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            AppError::Server(_) => Some(1),
            AppError::Config(_) => Some(2),
            AppError::Logger(_) => Some(3),
            _ => None,
        }
    }
}

/// Whole seconds for a `Retry-After` header, rounded up and never zero.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.content_type("text/plain; charset=utf-8");

        match self {
            AppError::MethodNotAllowed => {
                builder.insert_header((header::ALLOW, "POST"));
            }
            AppError::RateLimited { retry_after } => {
                builder.insert_header((
                    header::RETRY_AFTER,
                    retry_after_secs(*retry_after).to_string(),
                ));
            }
            _ => {}
        }

        builder.body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::RateLimited { retry_after: Duration::from_millis(10) }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::from(StoreError::LockPoisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_startup_failures_have_distinct_exit_codes() {
        let server = AppError::from(IoError::new(std::io::ErrorKind::AddrInUse, "taken"));
        assert_eq!(server.exit_code(), Some(1));
        assert_eq!(
            AppError::from(ConfigError::Invalid("x".into())).exit_code(),
            Some(2)
        );
        assert_eq!(AppError::Logger("x".into()).exit_code(), Some(3));
        assert_eq!(AppError::NotFound("x".into()).exit_code(), None);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
        assert_eq!(retry_after_secs(Duration::from_millis(250)), 1);
        assert_eq!(retry_after_secs(Duration::from_secs(2)), 2);
        assert_eq!(retry_after_secs(Duration::from_millis(2001)), 3);
    }

    #[test]
    fn test_rate_limited_response_headers() {
        let response = AppError::RateLimited {
            retry_after: Duration::from_millis(400),
        }
        .error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "1"
        );
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = AppError::MethodNotAllowed.error_response();
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }
}
