use actix_web::{web, HttpRequest, HttpResponse};

use crate::core::db::PostStore;
use crate::core::errors::{ApiError, Result};

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"message": "🐳 DevOps Social API is live!"}))
}

/// Liveness: answers as long as the process is up. Never touches the store.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

/// Readiness: the store must answer a ping.
pub async fn ready(store: web::Data<dyn PostStore>) -> Result<HttpResponse> {
    store.ping().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ready"})))
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse> {
    Err(ApiError::NotFound(format!(
        "no route for {} {}",
        req.method(),
        req.path()
    )))
}
