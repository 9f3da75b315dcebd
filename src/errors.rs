use thiserror::Error;

use crate::i18n::Language;
use crate::session::Flow;

#[derive(Error, Debug)]
pub enum KineticError {
    #[error("generation failed: {0}")] Generation(String),
    #[error("recommendation parse error: {0}")] RecommendationParse(String),
    #[error("sketch code is empty")] EmptyCode,
    #[error("no generated prompt to rewrite")] NoPrompt,
    #[error("invalid option field: {0}")] InvalidField(String),
    #[error("config error: {0}")] Config(String),
}

impl KineticError {
    /// Localized line shown when `flow` fails with this error.
    /// Any recommendation failure names the kind that was asked for.
    pub fn user_message(&self, lang: Language, flow: Flow) -> String {
        let key = match (self, flow) {
            (KineticError::EmptyCode, _) => "error_code_empty",
            (KineticError::NoPrompt, _) => "error_no_prompt",
            (_, Flow::Recommend(kind)) => return format!("{}{}", lang.t("error_ai_recommendation"), kind),
            (_, Flow::Generate) => "error_generation_failed",
            (_, Flow::Vary) => "error_variation_failed",
            (_, Flow::Assist) => "error_code_assist_failed",
        };
        lang.t(key).to_string()
    }
}
