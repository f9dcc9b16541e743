use actix_web::{web, HttpResponse, Responder};

mod short_url;

use crate::{
    handlers::{index_handler, ShortenerServiceType},
    types::{AppState, HealthStatus, Result},
};

// Handler function for the health check endpoint
async fn health_check(
    data: web::Data<AppState>,
    service: web::Data<ShortenerServiceType>,
) -> Result<impl Responder> {
    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        uptime_seconds: data.start_time.elapsed().as_secs(),
        stored_urls: service.stored_urls()?,
    };

    Ok(HttpResponse::Ok().json(status))
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler));
    cfg.route("/health", web::get().to(health_check));
    short_url::configure_routes(cfg);
}
