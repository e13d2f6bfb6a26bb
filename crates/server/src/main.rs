use std::sync::Arc;

use server::clients::gemini::GeminiClient;
use server::clients::image::ImageLoader;
use server::clients::Transcriber;
use server::config;
use server::routes;

use axum::{routing::{get, post}, Extension, Router};
use scoresheet_core::{ArtifactStore, Pipeline};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;

    let loader = Arc::new(ImageLoader::new(config.http_timeout_secs, config.image_root.clone())?);
    let transcriber: Arc<dyn Transcriber> =
        Arc::new(GeminiClient::new(config.model.clone(), config.http_timeout_secs)?);
    let pipeline = Pipeline::new(config.notation_table, ArtifactStore::new(&config.artifact_dir));

    tracing::info!(
        model = %config.model.model,
        table = pipeline.table().name(),
        artifacts = %pipeline.store().dir().display(),
        "Pipeline configured"
    );
    if config.image_root.is_none() {
        tracing::warn!("IMAGE_ROOT not set - any readable local path is accepted");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/generate_pgn", post(routes::scoresheet::generate_pgn))
        .layer(Extension(loader))
        .layer(Extension(transcriber))
        .layer(Extension(pipeline))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
