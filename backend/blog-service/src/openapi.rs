//! OpenAPI documentation for Blog Service

use crate::handlers;
use crate::schemas::{
    AuthorCreate, AuthorResponse, MessageResponse, PostCreate, PostEntity, PostResponse,
};
use crate::validation::FieldViolation;
use actix_web::HttpResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog API",
        version = "1.0.0",
        description = "Authors and the posts they own. Deleting an author deletes its posts.",
        license(
            name = "MIT"
        )
    ),
    paths(
        handlers::authors::create_author,
        handlers::authors::list_authors,
        handlers::authors::delete_author,
        handlers::authors::list_author_posts,
        handlers::posts::create_post,
        handlers::posts::list_posts,
        handlers::health::health_summary,
    ),
    components(schemas(
        AuthorCreate,
        AuthorResponse,
        PostCreate,
        PostResponse,
        PostEntity,
        MessageResponse,
        FieldViolation,
    )),
    tags(
        (name = "authors", description = "Author management and nested author posts"),
        (name = "posts", description = "Post creation and listing"),
        (name = "health", description = "Service health checks"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
