use actix_web::{http::header::LOCATION, web, HttpResponse, Responder};
use log::{debug, info};
use serde_json::json;

use crate::{
    errors::AppError,
    models::{CreateShortUrlDto, ShortUrlResponseDto, ShortenForm, UrlRecord},
    repositories::KeyStore,
    services::ShortenerService,
    templates::{render, IndexPage, ShortenedPage},
    types::Result,
};

pub type ShortenerServiceType = ShortenerService<KeyStore>;

/// Landing page with the shorten form
pub async fn index_handler() -> Result<impl Responder> {
    let html = render(&IndexPage)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Shorten a URL posted from the form and render the result page.
///
/// A blank or missing body falls back to `?url=` in the query string.
pub async fn shorten_handler(
    form: Option<web::Form<ShortenForm>>,
    query: Option<web::Query<ShortenForm>>,
    service: web::Data<ShortenerServiceType>,
) -> Result<impl Responder> {
    let form = form
        .map(web::Form::into_inner)
        .unwrap_or_default()
        .or_query(query.map(web::Query::into_inner));
    let url = service.shorten_form(form)?;
    let html = render(&ShortenedPage::from(&url))?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Any method other than POST on /shorten
pub async fn method_not_allowed_handler() -> Result<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// Redirect route handler
pub async fn redirect_handler(
    path: web::Path<String>,
    service: web::Data<ShortenerServiceType>,
) -> Result<impl Responder> {
    let key = path.into_inner();
    debug!("Redirect requested for key: {}", key);

    let record = service.resolve(&key)?;

    info!("Redirecting '{}' to '{}'", key, record.target);
    Ok(redirect_to(record))
}

/// /short/ without a key segment; still counts against the redirect limit
pub async fn missing_key_handler(
    service: web::Data<ShortenerServiceType>,
) -> Result<HttpResponse> {
    service.resolve("").map(redirect_to)
}

fn redirect_to(record: UrlRecord) -> HttpResponse {
    HttpResponse::MovedPermanently()
        .insert_header((LOCATION, record.target))
        .finish()
}

/// Create shortened URL through the JSON API
pub async fn create_handler(
    dto: web::Json<CreateShortUrlDto>,
    service: web::Data<ShortenerServiceType>,
) -> Result<impl Responder> {
    let url = service.shorten_dto(dto.into_inner())?;
    Ok(HttpResponse::Created().json(json!({
        "data": url,
        "message": "Successfully created URL",
    })))
}

/// Look up a key through the JSON API; shares the redirect rate limit
pub async fn get_by_key_handler(
    path: web::Path<String>,
    service: web::Data<ShortenerServiceType>,
) -> Result<impl Responder> {
    let record = service.resolve(&path.into_inner())?;
    let url = ShortUrlResponseDto::from_record(record, service.base_url());
    Ok(HttpResponse::Ok().json(json!({
        "data": url,
        "message": "Successfully retrieved URL",
    })))
}
