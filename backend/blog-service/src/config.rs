//! Configuration management for Blog Service
//!
//! All settings come from environment variables (a `.env` file is loaded
//! first by `main`).

use crate::SERVICE_NAME;
use db_pool::env_utils::parse_env_with_default;
use db_pool::DbConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database pool configuration
    pub database: DbConfig,
    /// Log output configuration
    pub log: LogConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of HTTP worker threads
    pub workers: usize,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl CorsConfig {
    /// Iterate the configured origins, trimmed and without empties
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default)
    Text,
    /// One JSON object per event
    Json,
}

/// Log output configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Selected by `LOG_FORMAT=json`, anything else is text
    pub format: LogFormat,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_with_default("BLOG_SERVICE_PORT", 8000),
            workers: parse_env_with_default("BLOG_SERVICE_WORKERS", 4),
        };

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if app.is_production() => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            if app.is_production() && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://blog.db".to_string());
        if !database_url.starts_with("sqlite:") {
            return Err(format!(
                "DATABASE_URL must be a sqlite URL, got '{}'",
                database_url.split(':').next().unwrap_or_default()
            ));
        }

        let log = LogConfig {
            format: match std::env::var("LOG_FORMAT") {
                Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        };

        Ok(Config {
            app,
            cors,
            database: DbConfig::with_url(SERVICE_NAME, database_url),
            log,
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
