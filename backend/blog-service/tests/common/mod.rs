#![allow(dead_code)]

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{middleware::NormalizePath, test, web, App};
use blog_service::db::MIGRATOR;
use blog_service::handlers;
use blog_service::schemas::{AuthorResponse, PostResponse};
use serde_json::json;
use sqlx::SqlitePool;

/// Fresh in-memory database with the schema applied
pub async fn create_test_pool() -> SqlitePool {
    let pool = db_pool::create_memory_pool()
        .await
        .expect("create in-memory pool");
    db_pool::migrate(&pool, &MIGRATOR)
        .await
        .expect("run migrations");
    pool
}

pub async fn setup_test_app(
    pool: SqlitePool,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .wrap(NormalizePath::trim())
            .configure(handlers::configure),
    )
    .await
}

pub async fn create_author<S>(app: &S, name: &str, email: &str) -> AuthorResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/authors")
        .set_json(json!({"name": name, "email": email}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "author creation failed");
    test::read_body_json(resp).await
}

pub async fn create_post<S>(app: &S, title: &str, content: &str, author_id: i64) -> PostResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"title": title, "content": content, "author_id": author_id}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "post creation failed");
    test::read_body_json(resp).await
}

pub async fn get_json<S>(app: &S, uri: &str) -> serde_json::Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "GET {} failed", uri);
    test::read_body_json(resp).await
}
