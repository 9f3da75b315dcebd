use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::options::PromptLanguage;
use crate::wire::{GenerateRequest, Instruction, ModelParams, ModelTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VariationKind {
    Cinematic,
    Whimsical,
    Concise,
}

impl VariationKind {
    fn directive(self) -> &'static str {
        match self {
            Self::Cinematic => "Rewrite the following video prompt to be more cinematic, focusing on camera angles, lighting, and dramatic motion.",
            Self::Whimsical => "Rewrite the following video prompt to be more whimsical and playful, using imaginative and fantastical language.",
            Self::Concise => "Rewrite the following video prompt to be more concise and punchy, capturing the essence in fewer words while remaining vivid.",
        }
    }
}

/// Instruction asking the model to restyle an already generated prompt.
pub fn build_variation_request(existing: &str, kind: VariationKind, language: PromptLanguage) -> String {
    let lang = match language {
        PromptLanguage::English => "The final output must be in English.",
        PromptLanguage::Korean => "The final output must be in Korean.",
    };
    format!("{}\n\nOriginal Prompt: \"{}\"\n\n{}", kind.directive(), existing, lang)
}

pub fn variation_request(existing: &str, kind: VariationKind, language: PromptLanguage, params: ModelParams) -> GenerateRequest {
    GenerateRequest {
        tier: ModelTier::Flash,
        instruction: Instruction {
            system: "You are an expert creative prompt engineer for text-to-video AI models.".to_string(),
            user: build_variation_request(existing, kind, language),
        },
        params: Some(params),
        response_schema: None,
    }
}

/// Models tend to echo the quotes the prompt was wrapped in; drop them.
pub fn clean_variation_output(text: &str) -> String {
    static QUOTES: OnceLock<Regex> = OnceLock::new();
    let re = QUOTES.get_or_init(|| Regex::new(r#"^"|"$"#).expect("quote pattern compiles"));
    re.replace_all(text.trim(), "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CodeAssistKind {
    Refactor,
    Interactive,
    Creative,
    Explain,
}

impl CodeAssistKind {
    fn directive(self) -> &'static str {
        match self {
            Self::Refactor => "Refactor the following P5.js code to improve its readability, performance, and structure. Maintain the original functionality. Only output the raw code, without any explanation.",
            Self::Interactive => "Add mouse interaction (e.g., using mouseX, mouseY) to the following P5.js code to make it more dynamic and engaging. Maintain the core visual idea. Only output the raw code, without any explanation.",
            Self::Creative => "Take the following P5.js code and suggest a creative variation. This could involve changing colors, motion, shapes, or adding a new concept, while keeping the spirit of the original. Only output the raw code, without any explanation.",
            Self::Explain => "Explain the following P5.js code in a clear and concise way, as if you were explaining it to a beginner. Describe the setup() function and what happens in the draw() loop.",
        }
    }

    /// Whether the answer is meant to replace the sketch source.
    pub fn returns_code(self) -> bool {
        !matches!(self, Self::Explain)
    }

    /// Vocabulary key of the heading the answer is shown under.
    pub fn title_key(self) -> &'static str {
        if self.returns_code() {
            "code_input_title"
        } else {
            "code_explanation_title"
        }
    }
}

pub fn build_code_assist_request(code: &str, kind: CodeAssistKind) -> String {
    format!("{}\n\nCode:\n```javascript\n{}\n```", kind.directive(), code)
}

pub fn code_assist_request(code: &str, kind: CodeAssistKind, params: ModelParams) -> GenerateRequest {
    GenerateRequest {
        tier: ModelTier::Pro,
        instruction: Instruction {
            system: "You are an expert P5.js developer and assistant. You provide helpful code modifications and explanations.".to_string(),
            user: build_code_assist_request(code, kind),
        },
        params: Some(params),
        response_schema: None,
    }
}
