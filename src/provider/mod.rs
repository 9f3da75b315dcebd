use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::KineticError;
use crate::recommend::parse_recommendation;
use crate::wire::GenerateRequest;

pub mod gemini;
pub mod ollama;
pub mod openai;

/// The generation gateway: runs one request against a model and returns its text.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, KineticError>;

    /// Structured variant for requests carrying a `response_schema`.
    async fn generate_structured(&self, req: &GenerateRequest) -> Result<Map<String, Value>, KineticError> {
        let text = self.generate(req).await?;
        parse_recommendation(&text)
    }
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config) -> Result<DynProvider, KineticError> {
    let client = http_client(cfg.timeout_secs)?;
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::Gemini {
            pro_model: cfg.pro_model.clone(),
            flash_model: cfg.flash_model.clone(),
            api_key: cfg.api_key()?.unwrap_or_default(),
            api_base: cfg.base_url.clone().unwrap_or_else(|| gemini::DEFAULT_BASE.into()),
            client,
        })),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider {
            pro_model: cfg.pro_model.clone(),
            flash_model: cfg.flash_model.clone(),
            api_key: cfg.api_key()?.unwrap_or_default(),
            api_base: cfg.base_url.clone().unwrap_or_else(|| openai::DEFAULT_BASE.into()),
            client,
        })),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama {
            pro_model: cfg.pro_model.clone(),
            flash_model: cfg.flash_model.clone(),
            url: cfg.base_url.clone().unwrap_or_else(|| ollama::DEFAULT_URL.into()),
            client,
        })),
    }
}

fn http_client(timeout_secs: u64) -> Result<Client, KineticError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failure("http", e))
}

pub(crate) fn failure(provider: &str, e: impl Display) -> KineticError {
    KineticError::Generation(format!("{provider}: {e}"))
}

/// Sends a JSON body and returns the raw response text, failing on non-2xx.
pub(crate) async fn post_json(
    provider: &str,
    req: reqwest::RequestBuilder,
    body: &Value,
) -> Result<String, KineticError> {
    let resp = req.json(body).send().await.map_err(|e| failure(provider, format!("request failed: {e}")))?;
    let status = resp.status();
    let text = resp.text().await.map_err(|e| failure(provider, format!("read body failed: {e}")))?;
    tracing::debug!(provider, %status, bytes = text.len(), "model response received");
    if !status.is_success() {
        return Err(failure(provider, format!("API error ({status}): {text}")));
    }
    Ok(text)
}
