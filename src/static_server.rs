use actix_web::{web, HttpResponse};
use mime_guess::from_path;
use rust_embed::RustEmbed;

use crate::core::errors::{ApiError, Result};

#[derive(RustEmbed)]
#[folder = "static"]
struct Assets;

pub async fn index() -> Result<HttpResponse> {
    serve_asset("index.html")
}

pub async fn asset(path: web::Path<String>) -> Result<HttpResponse> {
    let file_path = match path.as_str() {
        "" => "index.html",
        p => p,
    };
    serve_asset(file_path)
}

fn serve_asset(file_path: &str) -> Result<HttpResponse> {
    let file = Assets::get(file_path)
        .ok_or_else(|| ApiError::NotFound(format!("asset {}", file_path)))?;

    let mime = from_path(file_path).first_or_octet_stream();

    Ok(HttpResponse::Ok()
        .content_type(mime.as_ref())
        .body(file.data.into_owned()))
}
