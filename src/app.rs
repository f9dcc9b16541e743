use std::sync::Arc;
use std::time::Instant;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment},
    errors::AppError,
    handlers::ShortenerServiceType,
    middleware::{RequestId, RequestLogger},
    repositories::KeyStore,
    routes,
    services::{RateLimiter, ShortenerService},
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

/// Builds the store, the redirect limiter and the service wrapping both
fn build_service(config: &Config) -> ShortenerServiceType {
    let store = KeyStore::with_key_length(
        config.shortener.key_length,
        config.shortener.collision_policy(),
    );
    let limiter = RateLimiter::new(
        config.rate_limit.window_size(),
        config.rate_limit.max_requests,
    );

    ShortenerService::new(
        Arc::new(store),
        Arc::new(limiter),
        config.server.public_base_url.clone(),
    )
    .require_http_scheme(config.shortener.require_http_scheme)
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );
    info!(
        "Redirects limited to {} per {:?}; short URLs under {}",
        config.rate_limit.max_requests,
        config.rate_limit.window_size(),
        config.server.public_base_url
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    let enable_debug_logging = config.app.environment != Environment::Production;

    // One instance shared by every worker
    let app_state = web::Data::new(AppState {
        start_time,
        version: config.app.version.clone(),
    });
    let service = web::Data::new(build_service(&config));

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T %{X-Request-ID}o"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}o"
    };

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(service.clone())
            .wrap(RequestId)
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(Logger::new(log_format))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
