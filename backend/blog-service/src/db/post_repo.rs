use crate::models::{Post, PostWithAuthor};
use sqlx::SqliteConnection;

/// Insert a new post and return it with its assigned id
///
/// An `author_id` with no matching author fails with a FOREIGN KEY violation.
pub async fn create_post(
    conn: &mut SqliteConnection,
    title: &str,
    content: &str,
    author_id: i64,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, author_id)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, author_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(post)
}

/// List posts together with their authors, optionally restricted to one author
pub async fn list_posts_with_authors(
    conn: &mut SqliteConnection,
    author_id: Option<i64>,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.title, p.content, p.author_id,
               a.name AS author_name, a.email AS author_email
        FROM posts p
        INNER JOIN authors a ON a.id = p.author_id
        WHERE ($1 IS NULL OR p.author_id = $1)
        ORDER BY p.id
        "#,
    )
    .bind(author_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(posts)
}

/// List the posts owned by an author
pub async fn find_posts_by_author(
    conn: &mut SqliteConnection,
    author_id: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, author_id
        FROM posts
        WHERE author_id = $1
        ORDER BY id
        "#,
    )
    .bind(author_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(posts)
}
