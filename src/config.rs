use std::{env, net::IpAddr, str::FromStr, time::Duration};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::ConfigError;
use crate::repositories::CollisionPolicy;
use crate::validations::validate_http_url;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
    /// Prefix of every generated short URL
    pub public_base_url: String,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Key generation and storage
#[derive(Debug, Deserialize, Clone)]
pub struct ShortenerConfig {
    pub key_length: usize,
    /// 0 keeps last-write-wins on key collisions
    pub collision_retries: usize,
    pub require_http_scheme: bool,
}

impl ShortenerConfig {
    pub fn collision_policy(&self) -> CollisionPolicy {
        CollisionPolicy::from_retries(self.collision_retries)
    }
}

// Fixed-window limit on the redirect route
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn window_size(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

// Implement FromStr trait for Environment enum to enable parsing from string
impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

// Result type for configuration functions
type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub shortener: ShortenerConfig,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        // Load .env file if it exists
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => warn!("Could not load .env file: {}", e),
        }

        let port: u16 = get_env_or_default("SERVER_PORT", "8080")?;
        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
            public_base_url: get_env_or_default(
                "PUBLIC_BASE_URL",
                &format!("http://localhost:{}", port),
            )?,
        };

        // Get version from Cargo.toml or environment
        let version = option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string();

        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "url-shortener")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
        };

        let shortener = ShortenerConfig {
            key_length: get_env_or_default("SHORTENER_KEY_LENGTH", "6")?,
            collision_retries: get_env_or_default("SHORTENER_COLLISION_RETRIES", "0")?,
            require_http_scheme: get_env_or_default("SHORTENER_REQUIRE_HTTP_SCHEME", "false")?,
        };

        let rate_limit = RateLimitConfig {
            window_ms: get_env_or_default("RATE_LIMIT_WINDOW_MS", "1000")?,
            max_requests: get_env_or_default("RATE_LIMIT_MAX_REQUESTS", "10")?,
        };

        let config = Config {
            server,
            app,
            shortener,
            rate_limit,
        };
        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }

    /// Rejects values the service cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shortener.key_length == 0 {
            return Err(ConfigError::Invalid(
                "SHORTENER_KEY_LENGTH must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(ConfigError::Invalid(
                "RATE_LIMIT_WINDOW_MS must be positive".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid(
                "RATE_LIMIT_MAX_REQUESTS must be positive".to_string(),
            ));
        }
        validate_http_url(&self.server.public_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "PUBLIC_BASE_URL '{}' is not usable: {}",
                self.server.public_base_url,
                e.message.unwrap_or(e.code)
            ))
        })?;

        Ok(())
    }
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}
