//! Gemini configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use gemini_client::{mask_token, HarmBlockThreshold, DEFAULT_BASE_URL};
use std::env;
use std::time::Duration;

use crate::catalog::{ModelCatalog, DEFAULT_MODELS};

/// Persona sent as the system instruction unless overridden.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Você é uma assistente de IA chamada Miku Nakano. Você é amigável, atenciosa, criativa e fala em português de forma natural e descontraída. Responda de maneira útil e envolvente.";

/// Gemini configuration interface.
pub trait GeminiConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn catalog(&self) -> &ModelCatalog;
    fn system_instruction(&self) -> Option<&str>;
    fn safety_threshold(&self) -> HarmBlockThreshold;
    fn timeout(&self) -> Duration;
}

/// Gemini config loaded from environment variables.
#[derive(Clone)]
pub struct EnvGeminiConfig {
    pub google_api_key: String,
    pub gemini_base_url: String,
    pub gemini_catalog: ModelCatalog,
    pub gemini_system_instruction: Option<String>,
    pub gemini_safety_threshold: HarmBlockThreshold,
    pub gemini_timeout_secs: u64,
}

impl std::fmt::Debug for EnvGeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvGeminiConfig")
            .field("google_api_key", &mask_token(&self.google_api_key))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_catalog", &self.gemini_catalog)
            .field("gemini_system_instruction", &self.gemini_system_instruction)
            .field("gemini_safety_threshold", &self.gemini_safety_threshold)
            .field("gemini_timeout_secs", &self.gemini_timeout_secs)
            .finish()
    }
}

impl GeminiConfig for EnvGeminiConfig {
    fn api_key(&self) -> &str {
        &self.google_api_key
    }
    fn base_url(&self) -> &str {
        &self.gemini_base_url
    }
    fn catalog(&self) -> &ModelCatalog {
        &self.gemini_catalog
    }
    fn system_instruction(&self) -> Option<&str> {
        self.gemini_system_instruction.as_deref()
    }
    fn safety_threshold(&self) -> HarmBlockThreshold {
        self.gemini_safety_threshold
    }
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.gemini_timeout_secs)
    }
}

impl EnvGeminiConfig {
    /// Load from environment variables.
    ///
    /// `GEMINI_SYSTEM_INSTRUCTION` (or `SYSTEM_PROMPT`) set to an empty string disables the
    /// persona; unset uses [`DEFAULT_SYSTEM_INSTRUCTION`].
    pub fn from_env() -> Result<Self> {
        let google_api_key = env::var("GOOGLE_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .context("GOOGLE_API_KEY (or GEMINI_API_KEY) not set")?;
        let gemini_base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let models = env::var("GEMINI_MODELS").unwrap_or_else(|_| DEFAULT_MODELS.to_string());
        let default_alias =
            env::var("GEMINI_DEFAULT_MODEL").unwrap_or_else(|_| "lite".to_string());
        let gemini_catalog = ModelCatalog::parse(&models, default_alias.trim())
            .context("invalid GEMINI_MODELS / GEMINI_DEFAULT_MODEL")?;
        let gemini_system_instruction = match env::var("GEMINI_SYSTEM_INSTRUCTION")
            .or_else(|_| env::var("SYSTEM_PROMPT"))
        {
            Ok(s) if s.trim().is_empty() => None,
            Ok(s) => Some(s),
            Err(_) => Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
        };
        let gemini_safety_threshold = match env::var("GEMINI_SAFETY_THRESHOLD") {
            Ok(raw) => raw
                .parse::<HarmBlockThreshold>()
                .map_err(anyhow::Error::msg)
                .context("invalid GEMINI_SAFETY_THRESHOLD")?,
            Err(_) => HarmBlockThreshold::BlockOnlyHigh,
        };
        let gemini_timeout_secs = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("GEMINI_TIMEOUT_SECS is not a number: {raw}"))?,
            Err(_) => 60,
        };
        Ok(Self {
            google_api_key,
            gemini_base_url,
            gemini_catalog,
            gemini_system_instruction,
            gemini_safety_threshold,
            gemini_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "GOOGLE_API_KEY",
        "GEMINI_API_KEY",
        "GEMINI_BASE_URL",
        "GEMINI_MODELS",
        "GEMINI_DEFAULT_MODEL",
        "GEMINI_SYSTEM_INSTRUCTION",
        "SYSTEM_PROMPT",
        "GEMINI_SAFETY_THRESHOLD",
        "GEMINI_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_only_the_key_is_set() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "AIza-test");

        let config = EnvGeminiConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.api_key(), "AIza-test");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.catalog(), &ModelCatalog::default());
        assert_eq!(config.system_instruction(), Some(DEFAULT_SYSTEM_INSTRUCTION));
        assert_eq!(config.safety_threshold(), HarmBlockThreshold::BlockOnlyHigh);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    #[serial]
    fn missing_api_key_is_an_error() {
        clear_env();
        assert!(EnvGeminiConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn overrides_are_read_from_env() {
        clear_env();
        env::set_var("GEMINI_API_KEY", "fallback-key");
        env::set_var("GEMINI_MODELS", "fast=gemini-2.5-flash,smart=gemini-2.5-pro");
        env::set_var("GEMINI_DEFAULT_MODEL", "smart");
        env::set_var("SYSTEM_PROMPT", "  ");
        env::set_var("GEMINI_SAFETY_THRESHOLD", "block_none");
        env::set_var("GEMINI_TIMEOUT_SECS", "15");

        let config = EnvGeminiConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.api_key(), "fallback-key");
        assert_eq!(config.catalog().default_alias(), "smart");
        assert_eq!(config.catalog().resolve("unknown"), "gemini-2.5-pro");
        assert_eq!(config.system_instruction(), None);
        assert_eq!(config.safety_threshold(), HarmBlockThreshold::BlockNone);
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    #[serial]
    fn default_alias_outside_catalog_is_rejected() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "k");
        env::set_var("GEMINI_DEFAULT_MODEL", "ultra");

        let result = EnvGeminiConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
