//! # Gemini API client
//!
//! Thin reqwest wrapper around the Gemini `models/{model}:generateContent` endpoint.
//! Provides the request/response wire types, token masking for safe logging, and a typed error.
//! Interpreting a response (candidates, finish reasons, safety blocks) is left to callers.

mod error;
mod types;

use std::time::Duration;

use tracing::{debug, info};

pub use error::GeminiError;
pub use types::{
    Candidate, Content, FinishReason, GenerateContentRequest, GenerateContentResponse,
    HarmBlockThreshold, HarmCategory, Part, PromptFeedback, SafetySetting, UsageMetadata,
};

/// Public Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[len - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Gemini REST client. Cheap to clone (shares the underlying connection pool).
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &mask_token(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Builds a client for `base_url` (e.g. [`DEFAULT_BASE_URL`]) whose requests fail after `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeminiError::from_transport)?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Sends one generateContent request and decodes the body.
    ///
    /// Non-2xx statuses become [`GeminiError::Status`] carrying the response body; the decoded
    /// response is returned as-is, even when it has no candidates.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        info!(
            model = %model,
            content_count = request.contents.len(),
            has_system_instruction = request.system_instruction.is_some(),
            api_key = %mask_token(&self.api_key),
            "Gemini generateContent request"
        );
        if let Ok(json) = serde_json::to_string(request) {
            debug!(request_json = %json, "Gemini generateContent request JSON");
        }

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(GeminiError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GeminiError::from_transport)?;
        if !status.is_success() {
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Decode(e.to_string()))?;

        if let Some(ref usage) = decoded.usage_metadata {
            info!(
                model = %model,
                prompt_tokens = ?usage.prompt_token_count,
                candidates_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini generateContent usage"
            );
        }
        Ok(decoded)
    }
}
