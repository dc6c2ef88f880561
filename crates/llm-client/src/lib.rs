//! # LLM client abstraction
//!
//! Defines the [`GenerationBackend`] trait (implemented for [`gemini_client::GeminiClient`]),
//! the alias → model [`ModelCatalog`], and [`TextGenerator`], which turns a prompt, a transcript
//! and a model alias into one generateContent call and validates the result.
//!
//! [`TextGenerator::generate_response`] never panics on provider output: every failure comes
//! back as a [`GenerationError`] so callers can show one uniform fallback reply.

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError, GenerateContentRequest, GenerateContentResponse};

mod catalog;
mod config;
mod generator;

pub use catalog::{ModelCatalog, DEFAULT_MODELS};
pub use config::{EnvGeminiConfig, GeminiConfig, DEFAULT_SYSTEM_INSTRUCTION};
pub use generator::{GeneratedReply, GenerationError, TextGenerator};

/// Something that can answer a generateContent request. The real implementation is
/// [`GeminiClient`]; tests substitute canned responses.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError>;
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        GeminiClient::generate_content(self, model, request).await
    }
}
