//! Data models for blog-service
//!
//! - Author: owns zero or more posts; email is unique
//! - Post: belongs to exactly one author, removed together with it

use sqlx::FromRow;

/// Row of the `authors` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Row of the `posts` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Post joined with its author in a single query
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
}

impl PostWithAuthor {
    pub fn into_parts(self) -> (Post, Author) {
        let author = Author {
            id: self.author_id,
            name: self.author_name,
            email: self.author_email,
        };
        let post = Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
        };
        (post, author)
    }
}
