//! Database connection pool management
//!
//! Provides SQLite pool creation, schema migration and per-request
//! connection checkout for services

pub mod env_utils;

use env_utils::parse_env_with_default;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name for log labeling
    pub service_name: String,
    /// SQLite connection URL (`sqlite://path/to.db` or `sqlite::memory:`)
    pub database_url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// Connection idle timeout
    pub idle_timeout_secs: u64,
    /// Connection maximum lifetime
    pub max_lifetime_secs: u64,
    /// Create the database file when it does not exist yet
    pub create_if_missing: bool,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .field("create_if_missing", &self.create_if_missing)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            database_url: String::new(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            create_if_missing: true,
        }
    }
}

impl DbConfig {
    /// Create a DbConfig for an explicit URL, reading pool tuning from the environment
    pub fn with_url(service_name: &str, database_url: impl Into<String>) -> Self {
        let defaults = Self::default();

        Self {
            service_name: service_name.to_string(),
            database_url: database_url.into(),
            max_connections: parse_env_with_default("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: parse_env_with_default("DB_MIN_CONNECTIONS", defaults.min_connections),
            acquire_timeout_secs: parse_env_with_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
            idle_timeout_secs: parse_env_with_default(
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout_secs,
            ),
            max_lifetime_secs: parse_env_with_default(
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime_secs,
            ),
            create_if_missing: defaults.create_if_missing,
        }
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            "Database Pool Configuration: \
             max_connections={}, min_connections={}, \
             acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.max_connections,
            self.min_connections,
            self.acquire_timeout_secs,
            self.idle_timeout_secs,
            self.max_lifetime_secs
        );
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        Ok(SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(self.create_if_missing)
            // Cascade deletes and reference checks depend on this pragma
            .foreign_keys(true))
    }
}

/// Create a SQLite connection pool and verify it with a round trip
pub async fn create_pool(config: DbConfig) -> Result<SqlitePool, sqlx::Error> {
    debug!(
        "Creating database pool: service={}, max={}, min={}, \
         acquire_timeout={}s, idle_timeout={}s",
        config.service_name,
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs,
        config.idle_timeout_secs
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(config.connect_options()?)
        .await?;

    verify(&pool, &config.service_name).await?;
    Ok(pool)
}

/// Create a single-connection in-memory pool
///
/// Every connection to `sqlite::memory:` opens its own empty database, so the
/// pool holds exactly one connection that never idles out or expires.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    verify(&pool, "memory").await?;
    Ok(pool)
}

async fn verify(pool: &SqlitePool, service: &str) -> Result<(), sqlx::Error> {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => {
            info!(service = %service, "Database pool created and verified successfully");
            Ok(())
        }
        Err(e) => {
            error!(
                service = %service,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
    }
}

/// Apply an embedded migration set to the pool
pub async fn migrate(pool: &SqlitePool, migrator: &Migrator) -> Result<(), MigrateError> {
    debug!(
        migrations = migrator.iter().count(),
        "Running database migrations"
    );

    migrator.run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Check out a connection from the pool, logging latency and failures
///
/// The returned connection goes back to the pool when dropped.
pub async fn acquire_with_logging(
    pool: &SqlitePool,
    service: &str,
) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
    let start = Instant::now();
    let result = pool.acquire().await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => debug!(service = %service, elapsed_ms, "Database connection acquired"),
        Err(e) => {
            let error_type = match e {
                sqlx::Error::PoolTimedOut => "timeout",
                sqlx::Error::PoolClosed => "closed",
                _ => "other",
            };
            warn!(
                service = %service,
                error_type,
                elapsed_ms,
                error = %e,
                "Database connection acquisition failed"
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_pool_env() {
        std::env::remove_var("DB_MAX_CONNECTIONS");
        std::env::remove_var("DB_MIN_CONNECTIONS");
        std::env::remove_var("DB_ACQUIRE_TIMEOUT_SECS");
        std::env::remove_var("DB_IDLE_TIMEOUT_SECS");
        std::env::remove_var("DB_MAX_LIFETIME_SECS");
    }

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout_secs, 10);
        assert!(config.create_if_missing);
    }

    #[test]
    #[serial_test::serial]
    fn test_with_url_without_override() {
        clear_pool_env();

        let config = DbConfig::with_url("test-service", "sqlite://test.db");
        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.database_url, "sqlite://test.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    #[serial_test::serial]
    fn test_with_url_env_override() {
        clear_pool_env();
        std::env::set_var("DB_MAX_CONNECTIONS", "12");

        let config = DbConfig::with_url("blog-service", "sqlite::memory:");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.min_connections, 1);

        clear_pool_env();
    }

    #[test]
    fn test_debug_redacts_url() {
        let config = DbConfig::with_url("svc", "sqlite:///secret/location.db");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn test_memory_pool_enforces_foreign_keys() {
        let pool = create_memory_pool().await.unwrap();
        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_memory_pool_keeps_state_across_checkouts() {
        let pool = create_memory_pool().await.unwrap();

        {
            let mut conn = acquire_with_logging(&pool, "test").await.unwrap();
            sqlx::query("CREATE TABLE t (v INTEGER)")
                .execute(&mut *conn)
                .await
                .unwrap();
        }

        let mut conn = acquire_with_logging(&pool, "test").await.unwrap();
        sqlx::query("INSERT INTO t (v) VALUES (1)")
            .execute(&mut *conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_acquire_times_out_when_pool_exhausted() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(100))
            .connect_with(options)
            .await
            .unwrap();

        let _held = acquire_with_logging(&pool, "test").await.unwrap();
        let result = acquire_with_logging(&pool, "test").await;
        assert!(matches!(result, Err(sqlx::Error::PoolTimedOut)));
    }
}
