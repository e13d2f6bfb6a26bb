use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::image::ScoresheetImage;
use super::{ClientError, Transcriber};
use crate::prompt::EXTRACTION_PROMPT;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Everything needed to reach the model. Passed in, never read from globals.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ModelConfig {
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiClient {
    client: Client,
    config: ModelConfig,
}

impl GeminiClient {
    pub fn new(config: ModelConfig, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent("ScoresheetPgn/1.0")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(format!("HTTP client error: {e}")))?;
        Ok(Self { client, config })
    }

    pub async fn generate(&self, image: &ScoresheetImage) -> Result<String, ClientError> {
        tracing::info!("Transcribing scoresheet via {}", self.config.model);

        let resp = self
            .client
            .post(self.config.generate_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request_body(image, EXTRACTION_PROMPT))
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Model(format!("Gemini error (HTTP {}): {body}", status.as_u16())));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Model(format!("Malformed model response: {e}")))?;

        response_text(parsed)
    }
}

#[async_trait]
impl Transcriber for GeminiClient {
    async fn transcribe(&self, image: &ScoresheetImage) -> Result<String, ClientError> {
        self.generate(image).await
    }
}

/// `generateContent` payload: prompt, inline image, relaxed safety settings.
pub fn request_body(image: &ScoresheetImage, prompt: &str) -> Value {
    let safety: Vec<Value> = HARM_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_ONLY_HIGH" }))
        .collect();

    json!({
        "contents": [{ "parts": [
            { "text": prompt },
            { "inlineData": { "mimeType": image.mime_type, "data": STANDARD.encode(&image.bytes) } }
        ]}],
        "safetySettings": safety
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn response_text(resp: GenerateContentResponse) -> Result<String, ClientError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        tracing::warn!("Prompt blocked: {reason}");
        return Err(ClientError::EmptyResponse { reason: Some(reason) });
    }

    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(ClientError::EmptyResponse { reason: None });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        tracing::warn!(finish_reason = ?candidate.finish_reason, "Model returned no text");
        return Err(ClientError::EmptyResponse { reason: candidate.finish_reason });
    }

    Ok(text)
}
