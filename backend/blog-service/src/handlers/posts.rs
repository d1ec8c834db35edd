//! Post handlers - HTTP endpoints for post operations

use crate::db::{author_repo, is_foreign_key_violation, post_repo, DbSession};
use crate::error::{AppError, Result};
use crate::schemas::{PostCreate, PostListQuery, PostResponse};
use crate::validation::{FieldViolation, ValidatedJson};
use actix_web::{web, HttpResponse};
use tracing::{info, warn};

const UNKNOWN_AUTHOR: &str = "Author does not exist";

/// Create a new post for an existing author
#[utoipa::path(
    post,
    path = "/posts",
    request_body = PostCreate,
    responses(
        (status = 200, description = "Post created", body = PostResponse),
        (status = 400, description = "Author does not exist"),
        (status = 422, description = "Invalid payload", body = [FieldViolation])
    ),
    tag = "posts"
)]
pub async fn create_post(
    body: ValidatedJson<PostCreate>,
    mut session: DbSession,
) -> Result<HttpResponse> {
    let PostCreate {
        title,
        content,
        author_id,
    } = body.into_inner();

    let Some(author) = author_repo::find_author_by_id(&mut session, author_id).await? else {
        warn!(author_id, "Rejected post for unknown author");
        return Err(AppError::BadRequest(UNKNOWN_AUTHOR.to_string()));
    };

    // The author can still vanish between the lookup and the insert
    let post = post_repo::create_post(&mut session, &title, &content, author_id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::BadRequest(UNKNOWN_AUTHOR.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    info!(post_id = post.id, author_id, "Post created");
    Ok(HttpResponse::Ok().json(PostResponse::from_parts(post, author)))
}

/// List posts with their authors, optionally for a single author
#[utoipa::path(
    get,
    path = "/posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts with embedded authors", body = [PostResponse]),
        (status = 422, description = "Invalid query parameter")
    ),
    tag = "posts"
)]
pub async fn list_posts(
    query: web::Query<PostListQuery>,
    mut session: DbSession,
) -> Result<HttpResponse> {
    let posts: Vec<PostResponse> =
        post_repo::list_posts_with_authors(&mut session, query.author_id)
            .await?
            .into_iter()
            .map(PostResponse::from)
            .collect();

    Ok(HttpResponse::Ok().json(posts))
}
