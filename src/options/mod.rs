use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::errors::KineticError;
use crate::i18n::Language;

/// A closed set of option values. `as_str` is the stored/wire label,
/// `label_key` the vocabulary key used when the value is shown or compiled.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn label_key(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptDetail {
    Low,
    Medium,
    High,
    Detailed,
}

impl Choice for PromptDetail {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Detailed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Detailed => "Detailed",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::Low => "detail_low",
            Self::Medium => "detail_medium",
            Self::High => "detail_high",
            Self::Detailed => "detail_detailed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraAngle {
    Frontal,
    #[serde(rename = "Top-down")]
    TopDown,
    Isometric,
    #[serde(rename = "Worm's eye")]
    WormsEye,
    #[serde(rename = "Bird's eye")]
    BirdsEye,
    #[serde(rename = "Wide Shot")]
    WideShot,
}

impl Choice for CameraAngle {
    const ALL: &'static [Self] = &[
        Self::Frontal,
        Self::TopDown,
        Self::Isometric,
        Self::WormsEye,
        Self::BirdsEye,
        Self::WideShot,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Frontal => "Frontal",
            Self::TopDown => "Top-down",
            Self::Isometric => "Isometric",
            Self::WormsEye => "Worm's eye",
            Self::BirdsEye => "Bird's eye",
            Self::WideShot => "Wide Shot",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::Frontal => "angle_frontal",
            Self::TopDown => "angle_top_down",
            Self::Isometric => "angle_isometric",
            Self::WormsEye => "angle_worms_eye",
            Self::BirdsEye => "angle_birds_eye",
            Self::WideShot => "angle_wide_shot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Standard,
}

impl Choice for AspectRatio {
    const ALL: &'static [Self] = &[Self::Landscape, Self::Portrait, Self::Square, Self::Standard];

    fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Square => "1:1",
            Self::Standard => "4:3",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::Landscape => "aspect_ratio_16_9",
            Self::Portrait => "aspect_ratio_9_16",
            Self::Square => "aspect_ratio_1_1",
            Self::Standard => "aspect_ratio_4_3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptLanguage {
    English,
    Korean,
}

impl PromptLanguage {
    /// Vocabulary table the compiled prompt is written from.
    pub fn locale(self) -> Language {
        match self {
            Self::English => Language::En,
            Self::Korean => Language::Ko,
        }
    }
}

impl Choice for PromptLanguage {
    const ALL: &'static [Self] = &[Self::English, Self::Korean];

    fn as_str(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Korean => "Korean",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::English => "language_english",
            Self::Korean => "language_korean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicStyle {
    #[serde(rename = "Calm Piano")]
    CalmPiano,
    #[serde(rename = "Smooth Jazz")]
    SmoothJazz,
    Synthwave,
    Chillhop,
}

impl Choice for MusicStyle {
    const ALL: &'static [Self] = &[Self::CalmPiano, Self::SmoothJazz, Self::Synthwave, Self::Chillhop];

    fn as_str(self) -> &'static str {
        match self {
            Self::CalmPiano => "Calm Piano",
            Self::SmoothJazz => "Smooth Jazz",
            Self::Synthwave => "Synthwave",
            Self::Chillhop => "Chillhop",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::CalmPiano => "music_calm_piano",
            Self::SmoothJazz => "music_smooth_jazz",
            Self::Synthwave => "music_synthwave",
            Self::Chillhop => "music_chillhop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Pastel,
    Monochromatic,
    Vibrant,
    Earthy,
}

impl Choice for Palette {
    const ALL: &'static [Self] = &[Self::Pastel, Self::Monochromatic, Self::Vibrant, Self::Earthy];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pastel => "Pastel",
            Self::Monochromatic => "Monochromatic",
            Self::Vibrant => "Vibrant",
            Self::Earthy => "Earthy",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::Pastel => "palette_pastel",
            Self::Monochromatic => "palette_monochromatic",
            Self::Vibrant => "palette_vibrant",
            Self::Earthy => "palette_earthy",
        }
    }
}

/// Every field of [`GenerationOptions`], in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    ExtractShapesColors,
    DetectAnimation,
    InterpretFunctions,
    InterpretCustomFunctions,
    AbstractAnimation,
    GeometricMusic,
    Organic,
    UpbeatElectronic,
    EnableDenoising,
    VideoDuration,
    PromptDetail,
    CameraAngle,
    AspectRatio,
    PromptLanguage,
    RelaxingAmbient,
    DefaultMusic,
    GlitchySfx,
    DefaultPalette,
    StyleNone,
}

/// Analysis flags with their vocabulary keys, in the order they are compiled.
pub const ANALYSIS_FLAGS: [(OptionField, &str); 8] = [
    (OptionField::ExtractShapesColors, "analysis_shapes_colors"),
    (OptionField::DetectAnimation, "analysis_animation"),
    (OptionField::InterpretFunctions, "analysis_interpret_functions"),
    (OptionField::InterpretCustomFunctions, "analysis_interpret_custom_functions"),
    (OptionField::AbstractAnimation, "analysis_abstract"),
    (OptionField::GeometricMusic, "analysis_geometric_music"),
    (OptionField::Organic, "analysis_organic"),
    (OptionField::UpbeatElectronic, "analysis_upbeat"),
];

impl OptionField {
    pub const ALL: [OptionField; 19] = [
        Self::ExtractShapesColors,
        Self::DetectAnimation,
        Self::InterpretFunctions,
        Self::InterpretCustomFunctions,
        Self::AbstractAnimation,
        Self::GeometricMusic,
        Self::Organic,
        Self::UpbeatElectronic,
        Self::EnableDenoising,
        Self::VideoDuration,
        Self::PromptDetail,
        Self::CameraAngle,
        Self::AspectRatio,
        Self::PromptLanguage,
        Self::RelaxingAmbient,
        Self::DefaultMusic,
        Self::GlitchySfx,
        Self::DefaultPalette,
        Self::StyleNone,
    ];

    /// Wire name, identical to the serde field name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ExtractShapesColors => "extractShapesColors",
            Self::DetectAnimation => "detectAnimation",
            Self::InterpretFunctions => "interpretFunctions",
            Self::InterpretCustomFunctions => "interpretCustomFunctions",
            Self::AbstractAnimation => "abstractAnimation",
            Self::GeometricMusic => "geometricMusic",
            Self::Organic => "organic",
            Self::UpbeatElectronic => "upbeatElectronic",
            Self::EnableDenoising => "enableDenoising",
            Self::VideoDuration => "videoDuration",
            Self::PromptDetail => "promptDetail",
            Self::CameraAngle => "cameraAngle",
            Self::AspectRatio => "aspectRatio",
            Self::PromptLanguage => "promptLanguage",
            Self::RelaxingAmbient => "relaxingAmbient",
            Self::DefaultMusic => "defaultMusic",
            Self::GlitchySfx => "glitchySFX",
            Self::DefaultPalette => "defaultPalette",
            Self::StyleNone => "styleNone",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn is_boolean(self) -> bool {
        !matches!(
            self,
            Self::VideoDuration
                | Self::PromptDetail
                | Self::CameraAngle
                | Self::AspectRatio
                | Self::PromptLanguage
                | Self::DefaultMusic
                | Self::DefaultPalette
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    // analysis
    pub extract_shapes_colors: bool,
    pub detect_animation: bool,
    pub interpret_functions: bool,
    pub interpret_custom_functions: bool,
    pub abstract_animation: bool,
    pub geometric_music: bool,
    pub organic: bool,
    pub upbeat_electronic: bool,

    // video
    pub enable_denoising: bool,
    /// Seconds, kept as text so half-typed values survive; 1..=180 is only a UI hint.
    pub video_duration: String,
    pub prompt_detail: PromptDetail,
    pub camera_angle: CameraAngle,
    pub aspect_ratio: AspectRatio,
    pub prompt_language: PromptLanguage,

    // style
    pub relaxing_ambient: bool,
    pub default_music: MusicStyle,
    #[serde(rename = "glitchySFX")]
    pub glitchy_sfx: bool,
    pub default_palette: Palette,
    /// Master switch: when set, music, palette and both effects are left out
    /// of the compiled prompt but keep their stored values.
    pub style_none: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            extract_shapes_colors: true,
            detect_animation: true,
            interpret_functions: false,
            interpret_custom_functions: false,
            abstract_animation: false,
            geometric_music: false,
            organic: false,
            upbeat_electronic: false,

            enable_denoising: false,
            video_duration: "10".into(),
            prompt_detail: PromptDetail::Medium,
            camera_angle: CameraAngle::Frontal,
            aspect_ratio: AspectRatio::Landscape,
            prompt_language: PromptLanguage::English,

            relaxing_ambient: false,
            default_music: MusicStyle::CalmPiano,
            glitchy_sfx: false,
            default_palette: Palette::Pastel,
            style_none: false,
        }
    }
}

impl GenerationOptions {
    /// Value of a boolean field; `None` for text and choice fields.
    pub fn flag(&self, field: OptionField) -> Option<bool> {
        let v = match field {
            OptionField::ExtractShapesColors => self.extract_shapes_colors,
            OptionField::DetectAnimation => self.detect_animation,
            OptionField::InterpretFunctions => self.interpret_functions,
            OptionField::InterpretCustomFunctions => self.interpret_custom_functions,
            OptionField::AbstractAnimation => self.abstract_animation,
            OptionField::GeometricMusic => self.geometric_music,
            OptionField::Organic => self.organic,
            OptionField::UpbeatElectronic => self.upbeat_electronic,
            OptionField::EnableDenoising => self.enable_denoising,
            OptionField::RelaxingAmbient => self.relaxing_ambient,
            OptionField::GlitchySfx => self.glitchy_sfx,
            OptionField::StyleNone => self.style_none,
            OptionField::VideoDuration
            | OptionField::PromptDetail
            | OptionField::CameraAngle
            | OptionField::AspectRatio
            | OptionField::PromptLanguage
            | OptionField::DefaultMusic
            | OptionField::DefaultPalette => return None,
        };
        Some(v)
    }

    /// Returns a copy with one field replaced. The previous record is left as is.
    ///
    /// Booleans need a JSON bool, choices one of their labels, and the
    /// duration accepts either text or a number (stored as its text form).
    pub fn with_field(&self, field: OptionField, value: &Value) -> Result<Self, KineticError> {
        let mut next = self.clone();
        let flag = || value.as_bool().ok_or_else(|| mistyped(field, "a boolean", value));
        match field {
            OptionField::ExtractShapesColors => next.extract_shapes_colors = flag()?,
            OptionField::DetectAnimation => next.detect_animation = flag()?,
            OptionField::InterpretFunctions => next.interpret_functions = flag()?,
            OptionField::InterpretCustomFunctions => next.interpret_custom_functions = flag()?,
            OptionField::AbstractAnimation => next.abstract_animation = flag()?,
            OptionField::GeometricMusic => next.geometric_music = flag()?,
            OptionField::Organic => next.organic = flag()?,
            OptionField::UpbeatElectronic => next.upbeat_electronic = flag()?,
            OptionField::EnableDenoising => next.enable_denoising = flag()?,
            OptionField::VideoDuration => {
                next.video_duration = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => duration_text(n),
                    other => return Err(mistyped(field, "text or a number", other)),
                }
            }
            OptionField::PromptDetail => next.prompt_detail = choice(field, value)?,
            OptionField::CameraAngle => next.camera_angle = choice(field, value)?,
            OptionField::AspectRatio => next.aspect_ratio = choice(field, value)?,
            OptionField::PromptLanguage => next.prompt_language = choice(field, value)?,
            OptionField::RelaxingAmbient => next.relaxing_ambient = flag()?,
            OptionField::DefaultMusic => next.default_music = choice(field, value)?,
            OptionField::GlitchySfx => next.glitchy_sfx = flag()?,
            OptionField::DefaultPalette => next.default_palette = choice(field, value)?,
            OptionField::StyleNone => next.style_none = flag()?,
        }
        Ok(next)
    }

    /// Same as [`with_field`](Self::with_field) for a `name=value` style edit
    /// where the value arrives as plain text.
    pub fn with_field_text(&self, name: &str, raw: &str) -> Result<Self, KineticError> {
        let field = OptionField::from_name(name)
            .ok_or_else(|| KineticError::InvalidField(format!("unknown field '{name}'")))?;
        let value = if field.is_boolean() {
            match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Value::Bool(true),
                "false" | "no" | "off" | "0" => Value::Bool(false),
                _ => return Err(mistyped(field, "a boolean", &Value::String(raw.into()))),
            }
        } else {
            Value::String(raw.to_string())
        };
        self.with_field(field, &value)
    }
}

fn choice<T: Choice>(field: OptionField, value: &Value) -> Result<T, KineticError> {
    value
        .as_str()
        .and_then(T::from_label)
        .ok_or_else(|| mistyped(field, &format!("one of {:?}", T::labels()), value))
}

fn mistyped(field: OptionField, expected: &str, got: &Value) -> KineticError {
    KineticError::InvalidField(format!("{} expects {}, got {}", field.name(), expected, got))
}

/// Text form of a numeric duration. Whole floats drop their fraction (`42.0` -> "42").
pub fn duration_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Which auxiliary media the user attached. Only presence is known here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAssetFlags {
    pub has_image: bool,
    pub has_video: bool,
    pub has_audio: bool,
}

impl MediaAssetFlags {
    pub fn any(&self) -> bool {
        self.has_image || self.has_video || self.has_audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_labels_match_serde<T: Choice + Serialize>() {
        for c in T::ALL {
            assert_eq!(serde_json::to_value(c).unwrap(), json!(c.as_str()));
        }
    }

    #[test]
    fn choice_labels_match_their_serde_names() {
        assert_labels_match_serde::<PromptDetail>();
        assert_labels_match_serde::<CameraAngle>();
        assert_labels_match_serde::<AspectRatio>();
        assert_labels_match_serde::<PromptLanguage>();
        assert_labels_match_serde::<MusicStyle>();
        assert_labels_match_serde::<Palette>();
    }

    #[test]
    fn field_names_match_serialized_keys() {
        let v = serde_json::to_value(GenerationOptions::default()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), OptionField::ALL.len());
        for f in OptionField::ALL {
            assert!(obj.contains_key(f.name()), "missing {}", f.name());
            assert_eq!(obj[f.name()].is_boolean(), f.is_boolean());
        }
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let opts: GenerationOptions =
            serde_json::from_value(json!({ "styleNone": true, "cameraAngle": "Worm's eye" })).unwrap();
        assert!(opts.style_none);
        assert_eq!(opts.camera_angle, CameraAngle::WormsEye);
        assert_eq!(opts.video_duration, "10");
        assert!(opts.extract_shapes_colors);
    }

    #[test]
    fn with_field_leaves_original_untouched() {
        let base = GenerationOptions::default();
        let next = base.with_field(OptionField::Organic, &json!(true)).unwrap();
        assert!(next.organic);
        assert!(!base.organic);
    }

    #[test]
    fn with_field_rejects_wrong_types() {
        let base = GenerationOptions::default();
        assert!(base.with_field(OptionField::Organic, &json!("yes")).is_err());
        assert!(base.with_field(OptionField::AspectRatio, &json!("21:9")).is_err());
        assert!(base.with_field(OptionField::VideoDuration, &json!(true)).is_err());
    }

    #[test]
    fn duration_accepts_free_text_and_numbers() {
        let base = GenerationOptions::default();
        let typed = base.with_field(OptionField::VideoDuration, &json!("1a")).unwrap();
        assert_eq!(typed.video_duration, "1a");
        let whole = base.with_field(OptionField::VideoDuration, &json!(42.0)).unwrap();
        assert_eq!(whole.video_duration, "42");
        let frac = base.with_field(OptionField::VideoDuration, &json!(7.5)).unwrap();
        assert_eq!(frac.video_duration, "7.5");
    }

    #[test]
    fn text_edits_parse_by_field_type() {
        let base = GenerationOptions::default();
        let next = base
            .with_field_text("glitchySFX", "on")
            .and_then(|o| o.with_field_text("defaultPalette", "Earthy"))
            .unwrap();
        assert!(next.glitchy_sfx);
        assert_eq!(next.default_palette, Palette::Earthy);
        assert!(base.with_field_text("nope", "1").is_err());
    }
}
