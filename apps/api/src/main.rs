mod auth;
mod config;
mod db;
mod document;
mod editor;
mod errors;
mod export;
mod models;
mod persistence;
mod render;
mod routes;
mod state;
mod templates;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::GoTrueClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::editor::{spawn_eviction, EditorRegistry};
use crate::export::{ExportPipeline, HttpRasterizer};
use crate::persistence::{PgResumeStore, S3PhotoStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::PgTemplateCatalogue;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Hosted auth provider
    let auth = GoTrueClient::new(config.auth_url.clone(), config.auth_api_key.clone())?;
    info!("Auth client initialized ({})", config.auth_url);

    // Screenshot service for PDF export
    let rasterizer = HttpRasterizer::new(config.rasterizer_url.clone())?;
    info!(
        "Rasterizer initialized ({}, scale {})",
        config.rasterizer_url, config.export_scale
    );

    let editors = Arc::new(EditorRegistry::default());
    spawn_eviction(Arc::clone(&editors), config.editor_idle_timeout);
    info!(
        "Idle editors are evicted after {}s",
        config.editor_idle_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        store: Arc::new(PgResumeStore::new(db.clone())),
        photos: Arc::new(S3PhotoStore::new(
            s3,
            config.s3_bucket.clone(),
            config.s3_public_url.clone(),
        )),
        auth: Arc::new(auth),
        templates: Arc::new(PgTemplateCatalogue::new(db)),
        editors,
        export: ExportPipeline::new(Arc::new(rasterizer), config.export_scale),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets under the path, not as subdomains.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
