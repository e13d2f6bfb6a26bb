use std::sync::Arc;

use axum::{Extension, Json};
use scoresheet_core::{Pipeline, ResultRecord};
use serde::Deserialize;

use crate::clients::image::{ImageLoader, ImageSource};
use crate::clients::Transcriber;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub image: Option<String>,
}

/// POST /generate_pgn
pub async fn generate_pgn(
    Extension(loader): Extension<Arc<ImageLoader>>,
    Extension(transcriber): Extension<Arc<dyn Transcriber>>,
    Extension(pipeline): Extension<Pipeline>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<ResultRecord>, AppError> {
    let reference = req
        .image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("No image file provided.".to_string()))?;

    let image = loader.load(&ImageSource::parse(reference)).await?;
    let transcription = transcriber.transcribe(&image).await?;
    tracing::info!("Generated PGN:\n{transcription}");

    let record = tokio::task::spawn_blocking(move || pipeline.process(&transcription))
        .await
        .map_err(|e| AppError::Internal(format!("Pipeline task failed: {e}")))??;

    tracing::info!(
        white = %record.details.white,
        black = %record.details.black,
        valid = record.validation.is_valid,
        "Scoresheet processed"
    );

    Ok(Json(record))
}
