use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scoresheet_core::PipelineError;
use serde_json::json;

use crate::clients::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    UpstreamEmpty(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Model(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Transport(msg) => AppError::Transport(msg),
            ClientError::Model(msg) => AppError::Model(msg),
            ClientError::Rejected(msg) => AppError::BadRequest(msg),
            empty @ ClientError::EmptyResponse { .. } => AppError::UpstreamEmpty(empty.to_string()),
        }
    }
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::UpstreamEmpty(_) | AppError::Pipeline(PipelineError::UpstreamEmpty) => "upstream_empty",
            AppError::Transport(_) => "transport",
            AppError::Model(_) => "model",
            AppError::Pipeline(_) => "artifact",
            AppError::Internal(_) | AppError::Anyhow(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamEmpty(_)
            | AppError::Pipeline(PipelineError::UpstreamEmpty)
            | AppError::Transport(_)
            | AppError::Model(_) => StatusCode::BAD_GATEWAY,
            AppError::Pipeline(_) | AppError::Internal(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                msg.clone()
            }
            AppError::Pipeline(e @ PipelineError::UpstreamEmpty) => e.to_string(),
            AppError::Pipeline(e) => {
                tracing::error!("Artifact error: {e}");
                "Failed to save results".to_string()
            }
            AppError::Anyhow(e) => {
                tracing::error!("Unexpected error: {e}");
                "Internal server error".to_string()
            }
            other => {
                tracing::warn!("{other}");
                other.to_string()
            }
        };

        (
            status,
            Json(json!({ "error": { "kind": self.kind(), "message": message } })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Transport("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Pipeline(PipelineError::UpstreamEmpty).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Anyhow(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_conversion() {
        let err: AppError = ClientError::EmptyResponse { reason: None }.into();
        assert_eq!(err.kind(), "upstream_empty");
        assert_eq!(
            err.to_string(),
            "Empty response. Content was likely blocked by safety filters."
        );

        let err: AppError = ClientError::Rejected("nope".into()).into();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "nope"));
    }

    #[tokio::test]
    async fn test_error_body() {
        let resp = AppError::Transport("Failed to download image. Status code: 404".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["kind"], "transport");
        assert_eq!(body["error"]["message"], "Failed to download image. Status code: 404");
    }
}
