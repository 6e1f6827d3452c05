//! Posts API for the DevOps Social workshop demo.
//!
//! Handlers are stateless. The only shared value is the [`core::db::PostStore`]
//! registered as `web::Data<dyn PostStore>` by the caller of [`configure`].

use actix_web::{error::JsonPayloadError, web, HttpRequest};

pub mod config;
pub mod handlers;
pub mod posts;
pub mod static_server;

pub mod core {
    pub mod db;
    pub mod errors;
    pub mod helpers;
    pub mod memory;
}

pub mod models {
    #[allow(clippy::module_inception)]
    pub mod models;
}

use crate::core::errors::ApiError;

/// Register every route. The caller must add the store as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health))
        .route("/health/ready", web::get().to(handlers::ready))
        .route("/posts", web::get().to(posts::list_posts))
        .route("/posts", web::post().to(posts::create_post))
        .route("/stats", web::get().to(posts::get_stats))
        .route("/ui", web::get().to(static_server::index))
        .route("/ui/{file:.*}", web::get().to(static_server::asset))
        .default_service(web::to(handlers::not_found));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "rejected request body");
    ApiError::validation("body", format!("is not valid JSON: {}", err)).into()
}
