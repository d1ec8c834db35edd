//! Request and response bodies
//!
//! Responses carry exactly the fields the API promises; they are built from
//! persisted entities, never serialized from rows directly.

use crate::models::{Author, Post, PostWithAuthor};
use crate::validation::{ExpectedField, RequestSchema};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthorCreate {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
}

impl RequestSchema for AuthorCreate {
    const FIELDS: &'static [ExpectedField] =
        &[ExpectedField::string("name"), ExpectedField::string("email")];
}

impl AuthorCreate {
    /// Lowercase the email domain; the local part is kept as sent
    pub fn normalize(mut self) -> Self {
        if let Some((local, domain)) = self.email.rsplit_once('@') {
            self.email = format!("{}@{}", local, domain.to_lowercase());
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PostCreate {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

impl RequestSchema for PostCreate {
    const FIELDS: &'static [ExpectedField] = &[
        ExpectedField::string("title"),
        ExpectedField::string("content"),
        ExpectedField::integer("author_id"),
    ];
}

/// Query parameters for `GET /posts`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    /// Only return posts owned by this author
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            email: author.email,
        }
    }
}

/// Post with its author embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: AuthorResponse,
}

impl PostResponse {
    pub fn from_parts(post: Post, author: Author) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author: author.into(),
        }
    }
}

impl From<PostWithAuthor> for PostResponse {
    fn from(row: PostWithAuthor) -> Self {
        let (post, author) = row.into_parts();
        Self::from_parts(post, author)
    }
}

/// Bare post row, as listed under `GET /authors/{id}/posts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

impl From<Post> for PostEntity {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_lowercases_domain_only() {
        let author = AuthorCreate {
            name: "Ada".into(),
            email: "Ada.Lovelace@Example.COM".into(),
        }
        .normalize();
        assert_eq!(author.email, "Ada.Lovelace@example.com");
        assert_eq!(author.name, "Ada");
    }

    #[test]
    fn test_post_response_embeds_author() {
        let row = PostWithAuthor {
            id: 3,
            title: "T".into(),
            content: "C".into(),
            author_id: 1,
            author_name: "Ada".into(),
            author_email: "ada@x.com".into(),
        };

        let body = serde_json::to_value(PostResponse::from(row)).unwrap();
        assert_eq!(
            body,
            json!({
                "id": 3,
                "title": "T",
                "content": "C",
                "author": {"id": 1, "name": "Ada", "email": "ada@x.com"}
            })
        );
    }

    #[test]
    fn test_post_entity_keeps_foreign_key() {
        let post = Post {
            id: 7,
            title: "T".into(),
            content: "C".into(),
            author_id: 2,
        };

        let body = serde_json::to_value(PostEntity::from(post)).unwrap();
        assert_eq!(
            body,
            json!({"id": 7, "title": "T", "content": "C", "author_id": 2})
        );
    }
}
