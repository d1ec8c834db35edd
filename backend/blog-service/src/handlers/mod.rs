//! HTTP handlers for blog endpoints
//!
//! This module contains handlers for:
//! - Authors: create, list, delete (cascading to posts), list an author's posts
//! - Posts: create, list with embedded authors
//! - Health and the OpenAPI document
//!
//! Posts cannot be updated or deleted individually.

pub mod authors;
pub mod health;
pub mod posts;

use crate::{openapi, validation};
use actix_web::web;

pub use authors::{create_author, delete_author, list_author_posts, list_authors};
pub use health::health_summary;
pub use posts::{create_post, list_posts};

/// Register every route of the service
///
/// Expects a `web::Data<SqlitePool>` in the app data. Wrap the app in
/// `NormalizePath::trim()` to accept trailing slashes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::path_config())
        .app_data(validation::query_config())
        .route("/health", web::get().to(health_summary))
        .route("/openapi.json", web::get().to(openapi::openapi_json))
        .service(
            web::scope("/authors")
                .service(
                    web::resource("")
                        .route(web::post().to(create_author))
                        .route(web::get().to(list_authors)),
                )
                .service(web::resource("/{id}").route(web::delete().to(delete_author)))
                .service(web::resource("/{id}/posts").route(web::get().to(list_author_posts))),
        )
        .service(
            web::scope("/posts").service(
                web::resource("")
                    .route(web::post().to(create_post))
                    .route(web::get().to(list_posts)),
            ),
        );
}
