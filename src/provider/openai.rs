use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{failure, post_json, Provider};
use crate::errors::KineticError;
use crate::wire::{GenerateRequest, ModelTier};

pub const DEFAULT_BASE: &str = "https://api.openai.com";

/// OpenAI chat completions. Structured requests switch on JSON mode and
/// append the expected schema to the system message.
pub struct OpenAIProvider {
    pub pro_model: String,
    pub flash_model: String,
    pub api_key: String,
    pub api_base: String,
    pub client: Client,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

fn request_body(model: &str, req: &GenerateRequest) -> Value {
    let mut system = req.instruction.system.clone();
    if let Some(schema) = &req.response_schema {
        system.push_str("\n\nRespond with a JSON object matching this schema:\n");
        system.push_str(&schema.to_string());
    }

    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": req.instruction.user },
        ],
    });
    if let Some(p) = req.params {
        body["temperature"] = json!(p.temperature);
        if let Some(top_p) = p.top_p {
            body["top_p"] = json!(top_p);
        }
    }
    if req.is_structured() {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

fn extract_text(raw: &str) -> Result<String, KineticError> {
    let parsed: ChatResponse =
        serde_json::from_str(raw).map_err(|e| failure("openai", format!("failed to parse response: {e}")))?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(failure("openai", "empty content"));
    }
    Ok(content.trim().to_string())
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, KineticError> {
        let model = match req.tier {
            ModelTier::Pro => &self.pro_model,
            ModelTier::Flash => &self.flash_model,
        };
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        tracing::debug!(%url, model = %model, "openai: POST");

        let builder = self.client.post(&url).bearer_auth(&self.api_key);
        let raw = post_json("openai", builder, &request_body(model, req)).await?;
        extract_text(&raw)
    }
}
