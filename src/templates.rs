//! HTML pages served by the form-based routes

use askama::Template;

use crate::errors::AppError;
use crate::models::ShortUrlResponseDto;

/// Landing page with the shorten form
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage;

/// Result page shown after a successful shorten
#[derive(Template)]
#[template(path = "shortened.html")]
pub struct ShortenedPage<'a> {
    pub original_url: &'a str,
    pub short_url: &'a str,
}

impl<'a> From<&'a ShortUrlResponseDto> for ShortenedPage<'a> {
    fn from(dto: &'a ShortUrlResponseDto) -> Self {
        Self {
            original_url: &dto.original_url,
            short_url: &dto.short_url,
        }
    }
}

/// Renders a page, mapping template failures to a 500
pub fn render<T: Template>(page: &T) -> Result<String, AppError> {
    page.render().map_err(|e| {
        log::error!("Template rendering failed: {}", e);
        AppError::Internal("Template rendering error".to_string())
    })
}
