use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::errors::AppError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub stored_urls: usize,
}

// Process-level facts shared with the health endpoint
pub struct AppState {
    pub start_time: Instant,
    pub version: String,
}
