use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::ProviderKind;
use crate::errors::KineticError;
use crate::i18n::Language;
use crate::wire::{ModelParams, ModelTier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub provider: ProviderKind,
    /// Model for prompt generation and code assistance.
    pub pro_model: String,
    /// Model for recommendations and variations.
    pub flash_model: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub generation: ModelParams,
    pub variation: ModelParams,
    pub assist: ModelParams,
    /// Language of headings and messages (the prompt language is an option).
    pub ui_language: Language,
    pub artifacts_dir: String,
    pub save_artifacts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-10-01".into(),
            provider: ProviderKind::Gemini,
            pro_model: "gemini-2.5-pro".into(),
            flash_model: "gemini-2.5-flash".into(),
            base_url: None,
            timeout_secs: 120,
            generation: ModelParams::new(0.8, Some(0.9)),
            variation: ModelParams::new(0.9, None),
            assist: ModelParams::new(0.5, None),
            ui_language: Language::Ko,
            artifacts_dir: ".kinetic".into(),
            save_artifacts: false,
        }
    }
}

impl Config {
    /// Defaults, overlaid with the TOML file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    /// Switches provider and resets both model names to that provider's defaults.
    pub fn with_provider(mut self, kind: ProviderKind) -> Self {
        let (pro, flash) = match kind {
            ProviderKind::Gemini => ("gemini-2.5-pro", "gemini-2.5-flash"),
            ProviderKind::OpenAI => ("gpt-4.1", "gpt-4.1-mini"),
            ProviderKind::Ollama => ("llama3.1", "llama3.1"),
        };
        self.provider = kind;
        self.pro_model = pro.into();
        self.flash_model = flash.into();
        self
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Pro => &self.pro_model,
            ModelTier::Flash => &self.flash_model,
        }
    }

    /// API key for the configured provider, read from the environment.
    /// Ollama needs none.
    pub fn api_key(&self) -> Result<Option<String>, KineticError> {
        let vars: &[&str] = match self.provider {
            ProviderKind::Gemini => &["GEMINI_API_KEY", "API_KEY"],
            ProviderKind::OpenAI => &["OPENAI_API_KEY"],
            ProviderKind::Ollama => return Ok(None),
        };
        vars.iter()
            .find_map(|v| std::env::var(v).ok().filter(|k| !k.trim().is_empty()))
            .map(Some)
            .ok_or_else(|| KineticError::Config(format!("{} env var is not set", vars.join(" or "))))
    }
}
