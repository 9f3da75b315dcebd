use tracing::{info, warn};

use crate::config::Config;
use crate::errors::KineticError;
use crate::options::{GenerationOptions, MediaAssetFlags};
use crate::prompt::generation_request;
use crate::provider::Provider;
use crate::recommend::{merge, recommendation_request, RecommendationKind};
use crate::rewrite::{clean_variation_output, code_assist_request, variation_request, CodeAssistKind, VariationKind};
use crate::wire::GenerateRequest;

/// Working state of one editing session. Every flow either succeeds and
/// replaces the relevant part, or fails and leaves the state as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub code: String,
    pub options: GenerationOptions,
    pub media: MediaAssetFlags,
    pub result: Option<String>,
}

/// The user action a gateway call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Generate,
    Recommend(RecommendationKind),
    Vary,
    Assist,
}

/// A finished gateway call, kept for artifact capture.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub stage: &'static str,
    pub request: GenerateRequest,
    pub response: String,
}

impl Session {
    pub fn new(code: impl Into<String>, options: GenerationOptions, media: MediaAssetFlags) -> Self {
        Self { code: code.into(), options, media, result: None }
    }

    pub async fn generate(&mut self, gateway: &dyn Provider, cfg: &Config) -> Result<Exchange, KineticError> {
        if self.code.trim().is_empty() {
            return Err(KineticError::EmptyCode);
        }
        let request = generation_request(&self.code, &self.options, &self.media, cfg.generation);
        let text = gateway.generate(&request).await?;
        info!(chars = text.len(), "video prompt generated");
        self.result = Some(text.trim().to_string());
        Ok(Exchange { stage: "generate", request, response: text })
    }

    /// Asks for `kind` settings and merges them. Options stay untouched on failure.
    pub async fn recommend(
        &mut self,
        gateway: &dyn Provider,
        kind: RecommendationKind,
    ) -> Result<Exchange, KineticError> {
        if self.code.trim().is_empty() {
            return Err(KineticError::EmptyCode);
        }
        let request = recommendation_request(&self.code, kind);
        let recommendation = gateway.generate_structured(&request).await.map_err(|e| {
            warn!(%kind, error = %e, "recommendation failed; options unchanged");
            e
        })?;
        self.options = merge(&self.options, &recommendation, kind);
        let response = serde_json::Value::Object(recommendation).to_string();
        Ok(Exchange { stage: "recommend", request, response })
    }

    pub async fn vary(
        &mut self,
        gateway: &dyn Provider,
        kind: VariationKind,
        cfg: &Config,
    ) -> Result<Exchange, KineticError> {
        let existing = self.result.as_deref().ok_or(KineticError::NoPrompt)?;
        let request = variation_request(existing, kind, self.options.prompt_language, cfg.variation);
        let text = gateway.generate(&request).await?;
        self.result = Some(clean_variation_output(&text));
        Ok(Exchange { stage: "vary", request, response: text })
    }

    /// Returns the assistant's answer. The sketch is not replaced.
    pub async fn assist(
        &self,
        gateway: &dyn Provider,
        kind: CodeAssistKind,
        cfg: &Config,
    ) -> Result<Exchange, KineticError> {
        if self.code.trim().is_empty() {
            return Err(KineticError::EmptyCode);
        }
        let request = code_assist_request(&self.code, kind, cfg.assist);
        let text = gateway.generate(&request).await?;
        Ok(Exchange { stage: "assist", request, response: text.trim().to_string() })
    }

    /// Drops code, options, media and result; options return to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records the requests it saw.
    struct Scripted {
        replies: Mutex<VecDeque<Result<String, KineticError>>>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, KineticError>>) -> Self {
            Self { replies: Mutex::new(replies.into()), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl Provider for Scripted {
        async fn generate(&self, req: &GenerateRequest) -> Result<String, KineticError> {
            self.seen.lock().unwrap().push(req.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(KineticError::Generation("script exhausted".into())))
        }
    }

    fn session() -> Session {
        Session::new("function draw(){ circle(50,50,20); }", GenerationOptions::default(), MediaAssetFlags::default())
    }

    #[tokio::test]
    async fn generate_stores_trimmed_result() {
        let gw = Scripted::new(vec![Ok("  A circle glows.\n".into())]);
        let mut s = session();
        let ex = s.generate(&gw, &Config::default()).await.unwrap();
        assert_eq!(s.result.as_deref(), Some("A circle glows."));
        assert_eq!(ex.stage, "generate");
        let seen = gw.seen.lock().unwrap();
        assert!(seen[0].instruction.user.contains("circle(50,50,20)"));
        assert_eq!(seen[0].params, Some(Config::default().generation));
    }

    #[tokio::test]
    async fn blank_code_is_rejected_before_the_gateway() {
        let gw = Scripted::new(vec![]);
        let mut s = Session::new("   \n", GenerationOptions::default(), MediaAssetFlags::default());
        assert!(matches!(s.generate(&gw, &Config::default()).await, Err(KineticError::EmptyCode)));
        assert!(gw.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_generation_keeps_previous_result() {
        let gw = Scripted::new(vec![Err(KineticError::Generation("quota".into()))]);
        let mut s = session();
        s.result = Some("old".into());
        assert!(s.generate(&gw, &Config::default()).await.is_err());
        assert_eq!(s.result.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn recommendation_merges_only_its_kind() {
        let gw = Scripted::new(vec![Ok(r#"{"defaultMusic":"Chillhop","aspectRatio":"1:1"}"#.into())]);
        let mut s = session();
        s.recommend(&gw, RecommendationKind::Style).await.unwrap();
        assert_eq!(s.options.default_music, crate::options::MusicStyle::Chillhop);
        assert_eq!(s.options.aspect_ratio, GenerationOptions::default().aspect_ratio);
        assert!(gw.seen.lock().unwrap()[0].is_structured());
    }

    #[tokio::test]
    async fn recommendation_needs_code() {
        let gw = Scripted::new(vec![Ok(r#"{"organic":true}"#.into())]);
        let mut s = Session::new("  \n", GenerationOptions::default(), MediaAssetFlags::default());
        let err = s.recommend(&gw, RecommendationKind::Analysis).await.unwrap_err();
        assert!(matches!(err, KineticError::EmptyCode));
        assert!(gw.seen.lock().unwrap().is_empty());
        assert!(!s.options.organic);
    }

    #[tokio::test]
    async fn unparseable_recommendation_leaves_options() {
        let gw = Scripted::new(vec![Ok("I would pick jazz.".into())]);
        let mut s = session();
        let before = s.options.clone();
        let err = s.recommend(&gw, RecommendationKind::Style).await.unwrap_err();
        assert!(matches!(err, KineticError::RecommendationParse(_)));
        assert_eq!(s.options, before);
    }

    #[tokio::test]
    async fn variation_needs_a_result_and_strips_quotes() {
        let gw = Scripted::new(vec![Ok("\"Shorter prompt.\"".into())]);
        let mut s = session();
        let cfg = Config::default();
        assert!(matches!(s.vary(&gw, VariationKind::Concise, &cfg).await, Err(KineticError::NoPrompt)));
        s.result = Some("Long prompt".into());
        s.vary(&gw, VariationKind::Concise, &cfg).await.unwrap();
        assert_eq!(s.result.as_deref(), Some("Shorter prompt."));
        assert!(gw.seen.lock().unwrap()[0].instruction.user.contains("Original Prompt: \"Long prompt\""));
    }

    #[tokio::test]
    async fn assist_does_not_touch_the_sketch() {
        let gw = Scripted::new(vec![Ok("It draws a circle.".into())]);
        let s = session();
        let ex = s.assist(&gw, CodeAssistKind::Explain, &Config::default()).await.unwrap();
        assert_eq!(ex.response, "It draws a circle.");
        assert_eq!(ex.request.tier, crate::wire::ModelTier::Pro);
        assert_eq!(s.code, session().code);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = session();
        s.options.style_none = true;
        s.media.has_audio = true;
        s.result = Some("x".into());
        s.reset();
        assert_eq!(s, Session::default());
        assert_eq!(s.options, GenerationOptions::default());
    }
}
