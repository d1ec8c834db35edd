//! Author handlers - HTTP endpoints for author operations

use crate::db::{author_repo, is_unique_violation, post_repo, DbSession};
use crate::error::{AppError, Result};
use crate::schemas::{AuthorCreate, AuthorResponse, MessageResponse, PostEntity};
use crate::validation::{FieldViolation, ValidatedJson};
use actix_web::{web, HttpResponse};
use tracing::info;

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    request_body = AuthorCreate,
    responses(
        (status = 200, description = "Author created", body = AuthorResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid payload", body = [FieldViolation])
    ),
    tag = "authors"
)]
pub async fn create_author(
    body: ValidatedJson<AuthorCreate>,
    mut session: DbSession,
) -> Result<HttpResponse> {
    let AuthorCreate { name, email } = body.into_inner().normalize();

    let author = author_repo::create_author(&mut session, &name, &email)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Author with email {} already exists", email))
            } else {
                AppError::Database(e)
            }
        })?;

    info!(author_id = author.id, "Author created");
    Ok(HttpResponse::Ok().json(AuthorResponse::from(author)))
}

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    responses(
        (status = 200, description = "All authors", body = [AuthorResponse])
    ),
    tag = "authors"
)]
pub async fn list_authors(mut session: DbSession) -> Result<HttpResponse> {
    let authors: Vec<AuthorResponse> = author_repo::list_authors(&mut session)
        .await?
        .into_iter()
        .map(AuthorResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(authors))
}

/// Delete an author together with all of its posts
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author and its posts deleted", body = MessageResponse),
        (status = 404, description = "Author not found")
    ),
    tag = "authors"
)]
pub async fn delete_author(path: web::Path<i64>, mut session: DbSession) -> Result<HttpResponse> {
    let author_id = path.into_inner();

    if !author_repo::delete_author(&mut session, author_id).await? {
        return Err(AppError::NotFound("Author not found".to_string()));
    }

    info!(author_id, "Author deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Author deleted")))
}

/// List the posts of one author as bare post rows
#[utoipa::path(
    get,
    path = "/authors/{id}/posts",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Posts owned by the author", body = [PostEntity]),
        (status = 404, description = "Author not found")
    ),
    tag = "authors"
)]
pub async fn list_author_posts(
    path: web::Path<i64>,
    mut session: DbSession,
) -> Result<HttpResponse> {
    let author_id = path.into_inner();

    if author_repo::find_author_by_id(&mut session, author_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Author not found".to_string()));
    }

    let posts: Vec<PostEntity> = post_repo::find_posts_by_author(&mut session, author_id)
        .await?
        .into_iter()
        .map(PostEntity::from)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}
