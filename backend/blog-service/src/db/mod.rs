//! Database access layer
//!
//! This module provides:
//! - The embedded schema migrations
//! - `DbSession`, the per-request connection extractor
//! - Repository functions for authors and posts
//! - Constraint-violation classification for storage errors

pub mod author_repo;
pub mod post_repo;

use crate::error::AppError;
use crate::SERVICE_NAME;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::ops::{Deref, DerefMut};

/// Schema for `authors` and `posts`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// One pooled connection checked out for the lifetime of a request
///
/// All reads and writes of a handler go through the session. The connection
/// returns to the pool when the session is dropped, whichever way the
/// handler exits.
pub struct DbSession(PoolConnection<Sqlite>);

impl DbSession {
    pub async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        db_pool::acquire_with_logging(pool, SERVICE_NAME)
            .await
            .map(DbSession)
    }
}

impl Deref for DbSession {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromRequest for DbSession {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req
            .app_data::<web::Data<SqlitePool>>()
            .map(|pool| pool.get_ref().clone());

        Box::pin(async move {
            let pool = pool
                .ok_or_else(|| AppError::Internal("database pool is not configured".to_string()))?;
            Ok(DbSession::begin(&pool).await?)
        })
    }
}

/// True when the error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// True when the error is a FOREIGN KEY constraint violation
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn migrated_pool() -> SqlitePool {
        let pool = db_pool::create_memory_pool().await.unwrap();
        db_pool::migrate(&pool, &MIGRATOR).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = migrated_pool().await;
        let mut session = DbSession::begin(&pool).await.unwrap();

        author_repo::create_author(&mut session, "Ada", "ada@x.com")
            .await
            .unwrap();
        let err = author_repo::create_author(&mut session, "Other", "ada@x.com")
            .await
            .unwrap_err();

        assert!(is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }

    #[tokio::test]
    async fn test_dangling_author_is_foreign_key_violation() {
        let pool = migrated_pool().await;
        let mut session = DbSession::begin(&pool).await.unwrap();

        let err = post_repo::create_post(&mut session, "T", "C", 42)
            .await
            .unwrap_err();

        assert!(is_foreign_key_violation(&err));
        assert!(!is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_session_returns_connection_on_drop() {
        // Single-connection pool: a leaked session would make the next begin time out
        let pool = migrated_pool().await;

        for _ in 0..5 {
            let mut session = DbSession::begin(&pool).await.unwrap();
            author_repo::list_authors(&mut session).await.unwrap();
        }
    }
}
