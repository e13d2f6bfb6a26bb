pub mod gemini;
pub mod image;

use async_trait::async_trait;

use self::image::ScoresheetImage;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network failure or a non-2xx answer from an image host.
    #[error("{0}")]
    Transport(String),

    /// The model answered, but not with anything usable.
    #[error("{0}")]
    Model(String),

    /// Blocked by safety filters or no text at all.
    #[error("Empty response. Content was likely blocked by safety filters.")]
    EmptyResponse { reason: Option<String> },

    /// The caller asked for something the loader refuses to read.
    #[error("{0}")]
    Rejected(String),
}

/// Turns a scoresheet image into PGN-like text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, image: &ScoresheetImage) -> Result<String, ClientError>;
}
