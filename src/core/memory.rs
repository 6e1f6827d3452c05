use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::core::db::PostStore;
use crate::core::errors::{ApiError, Result};
use crate::models::models::{NewPost, Post};

/// In-process store for running without Postgres. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryPostStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    // Insertion order, so ids ascend and timestamps never decrease.
    posts: Vec<Post>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| ApiError::StoreUnavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert(&self, post: NewPost) -> Result<Post> {
        let mut inner = self.lock()?;

        let now = Utc::now();
        let created_at = match inner.posts.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        inner.last_id += 1;
        let post = Post {
            id: inner.last_id,
            username: post.username,
            content: post.content,
            created_at,
        };
        inner.posts.push(post.clone());

        Ok(post)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Post>> {
        let inner = self.lock()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(inner.posts.iter().rev().take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<i64> {
        let inner = self.lock()?;
        Ok(inner.posts.len() as i64)
    }

    async fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(username: &str, content: &str) -> NewPost {
        NewPost {
            username: username.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids_and_timestamps() {
        let store = MemoryPostStore::new();
        let first = store.insert(new_post("alice", "one")).await.unwrap();
        let second = store.insert(new_post("bob", "two")).await.unwrap();

        assert!(second.id > first.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(second.username, "bob");
        assert_eq!(second.content, "two");
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = MemoryPostStore::new();
        for i in 0..5 {
            store.insert(new_post("alice", &format!("post {}", i))).await.unwrap();
        }

        let posts = store.recent(3).await.unwrap();
        let contents: Vec<_> = posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["post 4", "post 3", "post 2"]);
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = MemoryPostStore::new();
        assert!(store.recent(50).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn negative_limit_returns_nothing() {
        let store = MemoryPostStore::new();
        store.insert(new_post("alice", "hello")).await.unwrap();
        assert!(store.recent(-1).await.unwrap().is_empty());
    }
}
