use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::core::errors::Result;
use crate::models::models::{NewPost, Post};

/// Persistent backing for posts. Implementations assign `id` and `created_at`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Store a validated post and return it with its assigned id and timestamp.
    async fn insert(&self, post: NewPost) -> Result<Post>;

    /// Most recent posts, newest first (`created_at` then `id`, both descending).
    async fn recent(&self, limit: i64) -> Result<Vec<Post>>;

    async fn count(&self) -> Result<i64>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<()>;
}

const CREATE_POSTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(100) NOT NULL,
        content VARCHAR(280) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

// Advisory lock key serializing inserts, so `id` and `created_at` advance together.
const POSTS_INSERT_LOCK: i64 = 0x706f_7374;

const CREATE_POSTS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS posts_created_at_id_idx ON posts (created_at DESC, id DESC)";

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a bounded pool. Acquiring a connection fails after
    /// `acquire_timeout_secs` instead of waiting on an unreachable database.
    pub async fn connect(config: &DatabaseConfig) -> std::result::Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn ensure_schema(&self) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(CREATE_POSTS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_POSTS_INDEX).execute(&self.pool).await?;
        tracing::info!("posts table ready");
        Ok(())
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn insert(&self, post: NewPost) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        // Held until commit. `now()` is the transaction start, so the
        // timestamp is taken from the clock and clamped to the newest row.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(POSTS_INSERT_LOCK)
            .execute(&mut *tx)
            .await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (username, content, created_at)
            VALUES (
                $1,
                $2,
                GREATEST(
                    clock_timestamp(),
                    COALESCE((SELECT max(created_at) FROM posts), '-infinity'::timestamptz)
                )
            )
            RETURNING id, username, content, created_at
            "#,
        )
        .bind(&post.username)
        .bind(&post.content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(post)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, username, content, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
