//! Generation dispatch: build one request, call the backend, validate the first candidate.

use std::sync::Arc;

use conversation_store::{Role, TranscriptEntry};
use gemini_client::{
    Content, FinishReason, GeminiError, GenerateContentRequest, GenerateContentResponse,
    HarmBlockThreshold, SafetySetting,
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::catalog::ModelCatalog;
use crate::config::GeminiConfig;
use crate::GenerationBackend;

/// Provider role for user turns.
const USER_ROLE: &str = "user";
/// Provider role for assistant turns.
const MODEL_ROLE: &str = "model";

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    /// Provider model identifier actually used.
    pub model: String,
    /// Alias the caller asked for (may be unknown to the catalog).
    pub alias: String,
    pub finish_reason: Option<FinishReason>,
}

/// Why a generation produced no usable text.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Backend(#[from] GeminiError),

    #[error("response has no candidates field")]
    MissingCandidates,

    #[error("prompt blocked by the provider: {0}")]
    PromptBlocked(String),

    #[error("response has an empty candidate list")]
    NoCandidates,

    #[error("response blocked by safety filters ({0:?})")]
    SafetyBlocked(FinishReason),

    #[error("candidate has no content parts")]
    MissingContent,

    #[error("first content part has no text")]
    MissingText,
}

impl GenerationError {
    /// True for failures caused by provider content policy rather than transport or format.
    pub fn is_safety_block(&self) -> bool {
        matches!(
            self,
            GenerationError::SafetyBlocked(_) | GenerationError::PromptBlocked(_)
        )
    }
}

/// Turns (prompt, transcript, alias) into a single generateContent call.
#[derive(Clone)]
pub struct TextGenerator {
    backend: Arc<dyn GenerationBackend>,
    catalog: ModelCatalog,
    system_instruction: Option<String>,
    safety_settings: Vec<SafetySetting>,
}

impl TextGenerator {
    /// Generator with no system instruction and `BLOCK_ONLY_HIGH` for every harm category.
    pub fn new(backend: Arc<dyn GenerationBackend>, catalog: ModelCatalog) -> Self {
        Self {
            backend,
            catalog,
            system_instruction: None,
            safety_settings: SafetySetting::uniform(HarmBlockThreshold::BlockOnlyHigh),
        }
    }

    pub fn from_config(backend: Arc<dyn GenerationBackend>, config: &dyn GeminiConfig) -> Self {
        Self::new(backend, config.catalog().clone())
            .with_system_instruction(config.system_instruction().map(str::to_string))
            .with_safety_threshold(config.safety_threshold())
    }

    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    pub fn with_safety_threshold(mut self, threshold: HarmBlockThreshold) -> Self {
        self.safety_settings = SafetySetting::uniform(threshold);
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Persona (if any), then the transcript with `assistant` sent as `model`, then the prompt.
    pub fn build_request(&self, prompt: &str, history: &[TranscriptEntry]) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|entry| {
                let role = match entry.role {
                    Role::User => USER_ROLE,
                    Role::Assistant => MODEL_ROLE,
                };
                Content::text(role, entry.content.as_str())
            })
            .collect();
        contents.push(Content::text(USER_ROLE, prompt));

        GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_deref().map(Content::instruction),
            safety_settings: self.safety_settings.clone(),
            }
    }

    /// Generates a reply for `prompt` given `history` (oldest first) with the model for `alias`.
    ///
    /// Unknown aliases fall back to the catalog default. Every failure is logged here and
    /// returned as `Err`; nothing is retried.
    #[instrument(skip(self, prompt, history), fields(history_len = history.len()))]
    pub async fn generate_response(
        &self,
        prompt: &str,
        history: &[TranscriptEntry],
        alias: &str,
    ) -> Result<GeneratedReply, GenerationError> {
        let model = self.catalog.resolve(alias).to_string();
        if !self.catalog.contains(alias) {
            info!(alias = %alias, model = %model, "Unknown model alias, using default model");
        }
        let request = self.build_request(prompt, history);

        let result = match self.backend.generate_content(&model, &request).await {
            Ok(response) => extract_text(response),
            Err(e) => Err(GenerationError::from(e)),
        };

        match result {
            Ok((text, finish_reason)) => {
                info!(
                    model = %model,
                    alias = %alias,
                    finish_reason = ?finish_reason,
                    reply_len = text.chars().count(),
                    "Generation succeeded"
                );
                Ok(GeneratedReply {
                    text,
                    model,
                    alias: alias.to_string(),
                    finish_reason,
                })
            }
            Err(e) => {
                error!(model = %model, alias = %alias, error = %e, "Generation failed");
                Err(e)
            }
        }
    }
}

/// Validates a response in order: candidates present, non-empty, not safety-blocked,
/// first candidate has parts, first part has text.
fn extract_text(
    response: GenerateContentResponse,
) -> Result<(String, Option<FinishReason>), GenerationError> {
    let Some(candidates) = response.candidates else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerationError::PromptBlocked(reason));
        }
        return Err(GenerationError::MissingCandidates);
    };
    let Some(candidate) = candidates.into_iter().next() else {
        return Err(GenerationError::NoCandidates);
    };

    match candidate.finish_reason {
        Some(reason) if reason.is_safety_block() => {
            return Err(GenerationError::SafetyBlocked(reason));
        }
        Some(FinishReason::Stop) => {}
        other => warn!(finish_reason = ?other, "Unexpected finish reason"),
    }

    let part = candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .ok_or(GenerationError::MissingContent)?;
    match part.text {
        Some(text) if !text.trim().is_empty() => Ok((text, candidate.finish_reason)),
        _ => Err(GenerationError::MissingText),
    }
}
