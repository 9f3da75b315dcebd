use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ========================================
/// Gateway request types
/// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

/// Sampling parameters passed through to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl ModelParams {
    pub fn new(temperature: f32, top_p: Option<f32>) -> Self {
        Self { temperature, top_p }
    }
}

/// Which configured model a request should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Prompt generation and code assistance.
    Pro,
    /// Recommendations and variations.
    Flash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub tier: ModelTier,
    pub instruction: Instruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ModelParams>,
    /// JSON schema of the expected object for structured calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn is_structured(&self) -> bool {
        self.response_schema.is_some()
    }
}
