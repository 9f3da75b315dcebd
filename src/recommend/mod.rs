use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::errors::KineticError;
use crate::options::{
    AspectRatio, CameraAngle, Choice, GenerationOptions, MusicStyle, OptionField, Palette, PromptDetail,
    PromptLanguage,
};
use crate::wire::{GenerateRequest, Instruction, ModelTier};

/// Which group of options a recommendation is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Analysis,
    Video,
    Style,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    Boolean,
    Number { description: &'static str },
    Enum(fn() -> Vec<&'static str>),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: OptionField,
    pub ty: FieldType,
}

const fn boolean(field: OptionField) -> FieldSpec {
    FieldSpec { field, ty: FieldType::Boolean }
}

const ANALYSIS_FIELDS: [FieldSpec; 8] = [
    boolean(OptionField::ExtractShapesColors),
    boolean(OptionField::DetectAnimation),
    boolean(OptionField::InterpretFunctions),
    boolean(OptionField::InterpretCustomFunctions),
    boolean(OptionField::AbstractAnimation),
    boolean(OptionField::GeometricMusic),
    boolean(OptionField::Organic),
    boolean(OptionField::UpbeatElectronic),
];

const VIDEO_FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        field: OptionField::VideoDuration,
        ty: FieldType::Number { description: "Video duration in seconds, an integer between 1 and 180." },
    },
    FieldSpec { field: OptionField::AspectRatio, ty: FieldType::Enum(<AspectRatio as Choice>::labels) },
    FieldSpec { field: OptionField::PromptDetail, ty: FieldType::Enum(<PromptDetail as Choice>::labels) },
    FieldSpec { field: OptionField::CameraAngle, ty: FieldType::Enum(<CameraAngle as Choice>::labels) },
    boolean(OptionField::EnableDenoising),
    FieldSpec { field: OptionField::PromptLanguage, ty: FieldType::Enum(<PromptLanguage as Choice>::labels) },
];

const STYLE_FIELDS: [FieldSpec; 5] = [
    FieldSpec { field: OptionField::DefaultMusic, ty: FieldType::Enum(<MusicStyle as Choice>::labels) },
    FieldSpec { field: OptionField::DefaultPalette, ty: FieldType::Enum(<Palette as Choice>::labels) },
    boolean(OptionField::RelaxingAmbient),
    boolean(OptionField::GlitchySfx),
    boolean(OptionField::StyleNone),
];

impl RecommendationKind {
    #[cfg(test)]
    pub const ALL: [RecommendationKind; 3] = [Self::Analysis, Self::Video, Self::Style];

    pub fn name(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Video => "video",
            Self::Style => "style",
        }
    }

    /// The only fields a recommendation of this kind may set.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Analysis => &ANALYSIS_FIELDS,
            Self::Video => &VIDEO_FIELDS,
            Self::Style => &STYLE_FIELDS,
        }
    }

    pub fn allows(self, field: OptionField) -> bool {
        self.fields().iter().any(|s| s.field == field)
    }

    fn instruction(self) -> &'static str {
        match self {
            Self::Analysis => "Analyze this P5.js code. Based on its complexity and content, suggest the most relevant analysis options to extract its essence for a video prompt. For example, if it's a simple geometric animation, 'extractShapesColors' and 'detectAnimation' might be enough. If it contains complex custom logic, 'interpretCustomFunctions' would be useful. Your response must be a JSON object matching the provided schema.",
            Self::Video => "Analyze this P5.js code. Suggest optimal video settings for a cinematic representation. Consider the animation's style to recommend a suitable duration (an integer between 1 and 180 seconds), aspect ratio, level of detail, and camera angle. A fast, complex animation might benefit from a shorter duration and a 'Wide Shot', while a slow, detailed one might need more time. Also suggest a 'promptLanguage' ('English' or 'Korean'). Your response must be a JSON object matching the provided schema.",
            Self::Style => "Analyze this P5.js code. Suggest a creative style that complements the animation's mood. Recommend a music style, color palette, and other effects. A chaotic, glitchy animation might pair well with 'Synthwave' music and 'Glitchy SFX'. A calm, flowing animation might suit 'Calm Piano' and a 'Pastel' palette. If no specific style seems appropriate, set 'styleNone' to true. Your response must be a JSON object matching the provided schema.",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn recommend_system() -> &'static str {
    "You are an expert creative assistant. Your goal is to suggest the best settings based on the provided P5.js code. You must respond only with a valid JSON object that conforms to the provided schema."
}

/// JSON schema of the object a `kind` recommendation must return.
pub fn response_schema(kind: RecommendationKind) -> Value {
    let mut properties = Map::new();
    for spec in kind.fields() {
        let prop = match spec.ty {
            FieldType::Boolean => json!({ "type": "boolean" }),
            FieldType::Number { description } => json!({ "type": "number", "description": description }),
            FieldType::Enum(labels) => json!({ "type": "string", "enum": labels() }),
        };
        properties.insert(spec.field.name().to_string(), prop);
    }
    json!({ "type": "object", "properties": properties })
}

/// Schema-constrained request asking the model to suggest `kind` settings for `code`.
pub fn recommendation_request(code: &str, kind: RecommendationKind) -> GenerateRequest {
    GenerateRequest {
        tier: ModelTier::Flash,
        instruction: Instruction {
            system: recommend_system().to_string(),
            user: format!("{}\n\nP5.js code:\n```javascript\n{}\n```", kind.instruction(), code),
        },
        params: None,
        response_schema: Some(response_schema(kind)),
    }
}

/// Reads a model reply as a JSON object.
///
/// Accepts a bare object, one wrapped in a Markdown fence, or one embedded in
/// surrounding prose. Anything else is a `RecommendationParse` error.
pub fn parse_recommendation(raw: &str) -> Result<Map<String, Value>, KineticError> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\n?```$").expect("fence pattern compiles")
    });

    let trimmed = raw.trim();
    let body = fence
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => {
            return Err(KineticError::RecommendationParse(format!(
                "expected a JSON object, got {}",
                kind_of(&other)
            )))
        }
        Err(_) => {}
    }

    if let Some(obj) = extract_first_json_object(body) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(obj) {
            return Ok(map);
        }
    }

    Err(KineticError::RecommendationParse(format!("no JSON object in model reply: {}", truncate(trimmed, 200))))
}

/// Folds a recommendation into `current`, returning the new options.
///
/// Only the fields of `kind` are considered. Absent or `null` fields keep
/// their value, and a value of the wrong type is skipped.
pub fn merge(current: &GenerationOptions, recommendation: &Map<String, Value>, kind: RecommendationKind) -> GenerationOptions {
    let mut next = current.clone();
    for spec in kind.fields() {
        let name = spec.field.name();
        let value = match recommendation.get(name) {
            None | Some(Value::Null) => continue,
            Some(v) => v,
        };
        match next.with_field(spec.field, value) {
            Ok(updated) => next = updated,
            Err(e) => warn!(%kind, field = name, error = %e, "skipping recommended value"),
        }
    }

    for key in recommendation.keys() {
        let in_kind = OptionField::from_name(key).map(|f| kind.allows(f)).unwrap_or(false);
        if !in_kind {
            debug!(%kind, field = %key, "ignoring field outside recommendation kind");
        }
    }
    next
}

/// First balanced `{...}` in `s`, ignoring braces inside JSON strings.
fn extract_first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' if start.is_some() => in_string = true,
            b'{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|st| &s[st..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn analysis_merge_ignores_fields_of_other_kinds() {
        let current = GenerationOptions::default();
        let rec = obj(json!({ "organic": true, "aspectRatio": "9:16", "styleNone": true }));
        let updated = merge(&current, &rec, RecommendationKind::Analysis);
        assert!(updated.organic);
        assert_eq!(updated.aspect_ratio, AspectRatio::Landscape);
        assert!(!updated.style_none);
    }

    #[test]
    fn numeric_duration_becomes_text() {
        let current = GenerationOptions::default();
        let updated = merge(&current, &obj(json!({ "videoDuration": 42 })), RecommendationKind::Video);
        assert_eq!(updated.video_duration, "42");
        let updated = merge(&current, &obj(json!({ "videoDuration": 30.0 })), RecommendationKind::Video);
        assert_eq!(updated.video_duration, "30");
    }

    #[test]
    fn merge_is_partial_and_pure() {
        let current = GenerationOptions { relaxing_ambient: true, ..Default::default() };
        let rec = obj(json!({ "defaultMusic": "Synthwave", "glitchySFX": true }));
        let updated = merge(&current, &rec, RecommendationKind::Style);
        assert_eq!(updated.default_music, MusicStyle::Synthwave);
        assert!(updated.glitchy_sfx);
        assert!(updated.relaxing_ambient);
        assert_eq!(updated.default_palette, Palette::Pastel);
        assert_eq!(current.default_music, MusicStyle::CalmPiano);
        assert!(!current.glitchy_sfx);
    }

    #[test]
    fn full_video_recommendation_applies_every_field() {
        let rec = obj(json!({
            "videoDuration": 15,
            "aspectRatio": "1:1",
            "promptDetail": "Detailed",
            "cameraAngle": "Bird's eye",
            "enableDenoising": true,
            "promptLanguage": "Korean",
        }));
        let updated = merge(&GenerationOptions::default(), &rec, RecommendationKind::Video);
        assert_eq!(updated.video_duration, "15");
        assert_eq!(updated.aspect_ratio, AspectRatio::Square);
        assert_eq!(updated.prompt_detail, PromptDetail::Detailed);
        assert_eq!(updated.camera_angle, CameraAngle::BirdsEye);
        assert!(updated.enable_denoising);
        assert_eq!(updated.prompt_language, PromptLanguage::Korean);
    }

    #[test]
    fn bad_values_and_nulls_leave_fields_alone() {
        let current = GenerationOptions::default();
        let rec = obj(json!({
            "aspectRatio": "21:9",
            "cameraAngle": null,
            "enableDenoising": "yes",
            "promptDetail": "High",
        }));
        let updated = merge(&current, &rec, RecommendationKind::Video);
        assert_eq!(updated.aspect_ratio, current.aspect_ratio);
        assert_eq!(updated.camera_angle, current.camera_angle);
        assert!(!updated.enable_denoising);
        assert_eq!(updated.prompt_detail, PromptDetail::High);
    }

    #[test]
    fn schema_lists_exactly_the_kind_fields() {
        for kind in RecommendationKind::ALL {
            let schema = response_schema(kind);
            let props = schema["properties"].as_object().unwrap();
            assert_eq!(props.len(), kind.fields().len());
            for spec in kind.fields() {
                assert!(props.contains_key(spec.field.name()));
            }
        }
        let video = response_schema(RecommendationKind::Video);
        assert_eq!(video["properties"]["videoDuration"]["type"], "number");
        assert_eq!(video["properties"]["aspectRatio"]["enum"], json!(["16:9", "9:16", "1:1", "4:3"]));
        assert_eq!(
            video["properties"]["cameraAngle"]["enum"],
            json!(["Frontal", "Top-down", "Isometric", "Worm's eye", "Bird's eye", "Wide Shot"])
        );
    }

    #[test]
    fn kinds_partition_the_option_fields() {
        for field in OptionField::ALL {
            let owners = RecommendationKind::ALL.iter().filter(|k| k.allows(field)).count();
            assert_eq!(owners, 1, "{} belongs to {} kinds", field.name(), owners);
        }
    }

    #[test]
    fn request_embeds_code_and_schema() {
        let req = recommendation_request("circle(1,2,3);", RecommendationKind::Style);
        assert_eq!(req.tier, ModelTier::Flash);
        assert!(req.instruction.user.ends_with("```javascript\ncircle(1,2,3);\n```"));
        assert!(req.instruction.user.starts_with("Analyze this P5.js code. Suggest a creative style"));
        assert_eq!(req.response_schema, Some(response_schema(RecommendationKind::Style)));
    }

    #[test]
    fn parses_plain_fenced_and_embedded_objects() {
        let plain = parse_recommendation(r#" {"organic": true} "#).unwrap();
        assert_eq!(plain["organic"], json!(true));

        let fenced = parse_recommendation("```json\n{\"styleNone\": false}\n```").unwrap();
        assert_eq!(fenced["styleNone"], json!(false));

        let prose = parse_recommendation(r#"Sure! {"defaultMusic": "Chillhop", "note": "a } brace"} hope it helps"#).unwrap();
        assert_eq!(prose["defaultMusic"], json!("Chillhop"));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(parse_recommendation("[1, 2]"), Err(KineticError::RecommendationParse(_))));
        assert!(matches!(parse_recommendation("no json here"), Err(KineticError::RecommendationParse(_))));
        assert!(matches!(parse_recommendation(""), Err(KineticError::RecommendationParse(_))));
    }
}
