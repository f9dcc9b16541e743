use std::process;

use log::{error, log_enabled, Level};

mod app;
mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod templates;
mod types;
mod utils;
mod validations;

#[actix_web::main]
async fn main() {
    let Err(err) = app::server().await else {
        return;
    };

    // Config and logger failures happen before env_logger is installed
    if log_enabled!(Level::Error) {
        error!("{}", err);
    } else {
        eprintln!("url-shortener: {}", err);
    }

    if let Some(code) = err.exit_code() {
        process::exit(code);
    }
}
