use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use blog_service::config::{Config, LogFormat};
use blog_service::db::MIGRATOR;
use blog_service::handlers;
use db_pool::create_pool;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,blog_service=debug,db_pool=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Blog Service
///
/// Serves the author and post endpoints over HTTP, backed by SQLite.
///
/// # Routes
///
/// - `/authors` - Create and list authors
/// - `/authors/{id}` - Delete an author and its posts
/// - `/authors/{id}/posts` - List an author's posts
/// - `/posts` - Create posts, list posts (optionally `?author_id=`)
/// - `/health`, `/openapi.json`
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Configuration error: {}", e),
        )
    })?;

    init_tracing(config.log.format);

    tracing::info!(
        env = %config.app.env,
        version = env!("CARGO_PKG_VERSION"),
        "Starting blog-service"
    );

    config.database.log_config();
    let pool = create_pool(config.database.clone()).await.map_err(|e| {
        tracing::error!("Database initialization failed: {}", e);
        io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("Database initialization failed: {}", e),
        )
    })?;

    db_pool::migrate(&pool, &MIGRATOR).await.map_err(|e| {
        tracing::error!("Database migration failed: {}", e);
        io::Error::new(io::ErrorKind::Other, format!("Migration failed: {}", e))
    })?;

    let bind_address = config.bind_address();
    let workers = config.app.workers;
    let cors_config = config.cors.clone();
    let pool_data = web::Data::new(pool.clone());

    tracing::info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .wrap(cors)
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .workers(workers)
    .run()
    .await?;

    tracing::info!("Blog-service shutting down");
    pool.close().await;

    Ok(())
}
