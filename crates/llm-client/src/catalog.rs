//! Alias → model identifier mapping.

use anyhow::{bail, Result};

/// Built-in catalog, in display order: `alias=model` pairs separated by commas.
pub const DEFAULT_MODELS: &str =
    "lite=gemini-2.5-flash-lite,flash=gemini-2.5-flash,pro=gemini-2.5-pro";

/// Ordered set of user-facing aliases and the provider model each one maps to.
///
/// Always contains its default alias. Aliases are matched exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: Vec<(String, String)>,
    default_alias: String,
}

impl ModelCatalog {
    /// Builds a catalog; fails when it is empty, has duplicate aliases, or lacks `default_alias`.
    pub fn new(entries: Vec<(String, String)>, default_alias: impl Into<String>) -> Result<Self> {
        let default_alias = default_alias.into();
        if entries.is_empty() {
            bail!("model catalog is empty");
        }
        for (i, (alias, model)) in entries.iter().enumerate() {
            if alias.is_empty() || model.is_empty() {
                bail!("model catalog entry {} has an empty alias or model", i);
            }
            if entries[..i].iter().any(|(a, _)| a == alias) {
                bail!("duplicate model alias: {}", alias);
            }
        }
        if !entries.iter().any(|(a, _)| *a == default_alias) {
            bail!(
                "default model alias '{}' is not one of: {}",
                default_alias,
                entries
                    .iter()
                    .map(|(a, _)| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(Self {
            entries,
            default_alias,
        })
    }

    /// Parses `alias=model,alias=model,...` (whitespace around items is ignored).
    pub fn parse(raw: &str, default_alias: impl Into<String>) -> Result<Self> {
        let mut entries = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((alias, model)) = item.split_once('=') else {
                bail!("model catalog entry '{}' is not alias=model", item);
            };
            entries.push((alias.trim().to_string(), model.trim().to_string()));
        }
        Self::new(entries, default_alias)
    }

    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    pub fn default_model(&self) -> &str {
        self.model_for(&self.default_alias).unwrap_or_default()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.model_for(alias).is_some()
    }

    fn model_for(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, m)| m.as_str())
    }

    /// Model for `alias`, or the default alias's model when `alias` is unknown.
    pub fn resolve(&self, alias: &str) -> &str {
        self.model_for(alias)
            .unwrap_or_else(|| self.default_model())
    }

    /// Aliases in catalog order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(a, _)| a.as_str())
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                ("lite".to_string(), "gemini-2.5-flash-lite".to_string()),
                ("flash".to_string(), "gemini-2.5-flash".to_string()),
                ("pro".to_string(), "gemini-2.5-pro".to_string()),
            ],
            default_alias: "lite".to_string(),
        }
    }
}
