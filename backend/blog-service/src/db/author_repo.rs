use crate::models::Author;
use sqlx::SqliteConnection;

/// Insert a new author and return it with its assigned id
///
/// A duplicate email fails with a UNIQUE constraint violation.
pub async fn create_author(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
) -> Result<Author, sqlx::Error> {
    let author = sqlx::query_as::<_, Author>(
        r#"
        INSERT INTO authors (name, email)
        VALUES ($1, $2)
        RETURNING id, name, email
        "#,
    )
    .bind(name)
    .bind(email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(author)
}

/// List all authors in insertion order
pub async fn list_authors(conn: &mut SqliteConnection) -> Result<Vec<Author>, sqlx::Error> {
    let authors = sqlx::query_as::<_, Author>(
        r#"
        SELECT id, name, email
        FROM authors
        ORDER BY id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(authors)
}

/// Find an author by ID
pub async fn find_author_by_id(
    conn: &mut SqliteConnection,
    author_id: i64,
) -> Result<Option<Author>, sqlx::Error> {
    let author = sqlx::query_as::<_, Author>(
        r#"
        SELECT id, name, email
        FROM authors
        WHERE id = $1
        "#,
    )
    .bind(author_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(author)
}

/// Delete an author; its posts go with it through ON DELETE CASCADE
///
/// Returns false when no author had this ID.
pub async fn delete_author(conn: &mut SqliteConnection, author_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(author_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
