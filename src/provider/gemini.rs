use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{failure, post_json, Provider};
use crate::errors::KineticError;
use crate::wire::{GenerateRequest, ModelTier};

pub const DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct Gemini {
    pub pro_model: String,
    pub flash_model: String,
    pub api_key: String,
    pub api_base: String,
    pub client: Client,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini spells schema types in upper case (`OBJECT`, `BOOLEAN`, ...).
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = match (k.as_str(), v) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_uppercase()),
                        _ => to_gemini_schema(v),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

fn request_body(req: &GenerateRequest) -> Value {
    let mut config = serde_json::Map::new();
    if let Some(p) = req.params {
        config.insert("temperature".into(), json!(p.temperature));
        if let Some(top_p) = p.top_p {
            config.insert("topP".into(), json!(top_p));
        }
    }
    if let Some(schema) = &req.response_schema {
        config.insert("responseMimeType".into(), json!("application/json"));
        config.insert("responseSchema".into(), to_gemini_schema(schema));
    }
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": req.instruction.user }] }],
        "systemInstruction": { "parts": [{ "text": req.instruction.system }] },
        "generationConfig": config,
    })
}

fn extract_text(raw: &str) -> Result<String, KineticError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(raw).map_err(|e| failure("gemini", format!("response parse error: {e}")))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(failure("gemini", "empty content"));
    }
    Ok(text.trim().to_string())
}

#[async_trait]
impl Provider for Gemini {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, KineticError> {
        let model = match req.tier {
            ModelTier::Pro => &self.pro_model,
            ModelTier::Flash => &self.flash_model,
        };
        let url = format!("{}/v1beta/models/{}:generateContent", self.api_base.trim_end_matches('/'), model);
        tracing::debug!(%url, structured = req.is_structured(), "gemini: POST");

        let builder = self.client.post(&url).header("x-goog-api-key", &self.api_key);
        let raw = post_json("gemini", builder, &request_body(req)).await?;
        extract_text(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{recommendation_request, RecommendationKind};
    use crate::wire::{Instruction, ModelParams};

    #[test]
    fn body_carries_system_and_sampling() {
        let req = GenerateRequest {
            tier: ModelTier::Pro,
            instruction: Instruction { system: "sys".into(), user: "usr".into() },
            params: Some(ModelParams::new(0.8, Some(0.9))),
            response_schema: None,
        };
        let body = request_body(&req);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "usr");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert!((body["generationConfig"]["topP"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn structured_body_uses_uppercase_schema_types() {
        let body = request_body(&recommendation_request("x", RecommendationKind::Video));
        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["enableDenoising"]["type"], "BOOLEAN");
        assert_eq!(schema["properties"]["aspectRatio"]["enum"][0], "16:9");
    }

    #[test]
    fn text_is_joined_from_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Neon "},{"text":"waves. "}]}}]}"#;
        assert_eq!(extract_text(raw).unwrap(), "Neon waves.");
        assert!(extract_text(r#"{"candidates":[]}"#).is_err());
        assert!(extract_text("not json").is_err());
    }
}
