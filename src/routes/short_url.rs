use actix_cors::Cors;
use actix_web::web;

use crate::{
    errors::AppError,
    handlers::{
        create_handler, get_by_key_handler, method_not_allowed_handler, missing_key_handler,
        redirect_handler, shorten_handler,
    },
};

// Configure the shorten/redirect routes and the JSON API
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Undecodable bodies are client errors, reported as plain 400s
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid form body: {}", err)).into()
    }))
    .app_data(web::JsonConfig::default().limit(32 * 1024).error_handler(|err, _req| {
        AppError::Validation(format!("Invalid JSON body: {}", err)).into()
    }));

    cfg.service(
        web::resource("/shorten")
            .route(web::post().to(shorten_handler))
            .default_service(web::to(method_not_allowed_handler)),
    );

    // Redirects answer any method
    cfg.route("/short/{key}", web::route().to(redirect_handler))
        .route("/short/", web::route().to(missing_key_handler))
        .route("/short", web::route().to(missing_key_handler));

    cfg.service(
        web::scope("/api")
            .wrap(Cors::permissive())
            .route("/shorten", web::post().to(create_handler))
            .route("/urls/{key}", web::get().to(get_by_key_handler)),
    );
}
