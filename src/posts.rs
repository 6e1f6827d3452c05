use actix_web::{web, HttpResponse};

use crate::config::LIST_LIMIT;
use crate::core::db::PostStore;
use crate::core::errors::Result;
use crate::core::helpers::validate_new_post;
use crate::models::models::{CreatePostRequest, PostList, Stats};

const DOCKER_MAGIC: &str = "🐳✨";

pub async fn create_post(
    store: web::Data<dyn PostStore>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let new_post = validate_new_post(body.into_inner()).map_err(|err| {
        tracing::warn!(error = %err, "rejected post");
        err
    })?;

    let post = store.insert(new_post).await?;
    tracing::info!(post_id = post.id, username = %post.username, "post created");

    Ok(HttpResponse::Created().json(post))
}

pub async fn list_posts(store: web::Data<dyn PostStore>) -> Result<HttpResponse> {
    let posts = store.recent(LIST_LIMIT).await?;
    Ok(HttpResponse::Ok().json(PostList { posts }))
}

pub async fn get_stats(store: web::Data<dyn PostStore>) -> Result<HttpResponse> {
    let total_posts = store.count().await?;
    Ok(HttpResponse::Ok().json(Stats {
        total_posts,
        docker_magic: DOCKER_MAGIC.to_string(),
    }))
}
