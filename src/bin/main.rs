use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use social::config::{Config, LogFormat, StoreBackend};
use social::core::db::{PgPostStore, PostStore};
use social::core::memory::MemoryPostStore;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn PostStore>> {
    match config.app.store {
        StoreBackend::Postgres => {
            tracing::info!(database = ?config.database, "connecting to post store");
            let store = PgPostStore::connect(&config.database)
                .await
                .context("failed to connect to postgres")?;
            store
                .ensure_schema()
                .await
                .context("failed to create posts table")?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory post store, posts are lost on restart");
            Ok(Arc::new(MemoryPostStore::new()))
        }
    }
}

fn cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default().allow_any_method().allow_any_header();
    for origin in origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.app.log_format);

    let store = web::Data::from(build_store(&config).await?);
    let origins = config.cors_origins();
    let (host, port) = config.bind_addr();

    tracing::info!(%host, port, "server listening");

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .configure(social::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
