use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post that passed validation and has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub username: String,
    pub content: String,
}

/// Body of `POST /posts`. Fields are optional so a missing one can be reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub username: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostList {
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Stats {
    pub total_posts: i64,
    pub docker_magic: String,
}
