use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{failure, post_json, Provider};
use crate::errors::KineticError;
use crate::wire::{GenerateRequest, ModelTier};

pub const DEFAULT_URL: &str = "http://localhost:11434";

pub struct Ollama {
    pub pro_model: String,
    pub flash_model: String,
    pub url: String,
    pub client: Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

fn request_body(model: &str, req: &GenerateRequest) -> Value {
    let mut options = serde_json::Map::new();
    if let Some(p) = req.params {
        options.insert("temperature".into(), json!(p.temperature));
        if let Some(top_p) = p.top_p {
            options.insert("top_p".into(), json!(top_p));
        }
    }
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": req.instruction.system },
            { "role": "user", "content": req.instruction.user },
        ],
        "stream": false,
        "options": options,
    });
    if let Some(schema) = &req.response_schema {
        body["format"] = schema.clone();
    }
    body
}

#[async_trait]
impl Provider for Ollama {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, KineticError> {
        let model = match req.tier {
            ModelTier::Pro => &self.pro_model,
            ModelTier::Flash => &self.flash_model,
        };
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        tracing::debug!(%url, model = %model, "ollama: POST");

        let raw = post_json("ollama", self.client.post(&url), &request_body(model, req)).await?;

        // Fall back to the raw body when it is not a chat envelope.
        let content = match serde_json::from_str::<ChatResponse>(&raw) {
            Ok(c) => c.message.content,
            Err(_) => raw,
        };
        if content.trim().is_empty() {
            return Err(failure("ollama", "empty content"));
        }
        Ok(content.trim().to_string())
    }
}
