use crate::i18n::Language;
use crate::options::{Choice, GenerationOptions, MediaAssetFlags, ANALYSIS_FLAGS};
use crate::wire::{GenerateRequest, Instruction, ModelParams, ModelTier};

const LIST_SEPARATOR: &str = ", ";

fn system_instruction_en() -> &'static str {
    r#"You are an expert P5.js developer and a creative prompt engineer for text-to-video AI models like Sora and Veo. Your task is to analyze P5.js code and generate a concise, vivid, and descriptive prompt that captures the essence of the animation. The prompt should be cinematic and evocative."#
}

fn system_instruction_ko() -> &'static str {
    r#"당신은 전문 P5.js 개발자이자 Sora, Veo와 같은 텍스트-비디오 AI 모델을 위한 창의적인 프롬프트 엔지니어입니다. 당신의 임무는 P5.js 코드를 분석하고 애니메이션의 본질을 포착하는 간결하고 생생하며 서술적인 프롬프트를 생성하는 것입니다. 프롬프트는 영화 같고 감성을 자극해야 합니다."#
}

fn core_instruction_en() -> &'static str {
    r#"Analyze the following P5.js sketch code and generate a descriptive, detailed, and cinematic prompt for a text-to-video model like Sora or Veo. The prompt should describe the visual elements, their motion, the overall style, and the mood of the animation.

Focus on describing what is visually happening, not the code itself. For example, instead of "a loop draws 50 circles with random colors," say "Dozens of vibrant, multi-colored circles pop into existence, shimmering and dancing across a dark canvas.""#
}

fn core_instruction_ko() -> &'static str {
    r#"다음 P5.js 스케치 코드를 분석하여 Sora 또는 Veo와 같은 텍스트-비디오 모델을 위한 서술적이고 상세하며 영화 같은 프롬프트를 생성하세요. 프롬프트는 시각적 요소, 움직임, 전반적인 스타일 및 애니메이션의 분위기를 묘사해야 합니다.

코드 자체가 아닌 시각적으로 일어나는 일을 설명하는 데 집중하세요. 예를 들어, "루프가 무작위 색상으로 50개의 원을 그립니다" 대신 "활기차고 다채로운 수십 개의 원이 나타나 어두운 캔버스 위에서 반짝이며 춤을 춥니다"라고 표현하세요."#
}

/// Fixed system preamble sent alongside the compiled prompt.
pub fn system_instruction(lang: Language) -> &'static str {
    match lang {
        Language::En => system_instruction_en(),
        Language::Ko => system_instruction_ko(),
    }
}

fn core_instruction(lang: Language) -> &'static str {
    match lang {
        Language::En => core_instruction_en(),
        Language::Ko => core_instruction_ko(),
    }
}

/// Closing directive that pins the output language. Always the last paragraph.
fn language_directive(lang: Language) -> &'static str {
    match lang {
        Language::En => "Do not mix languages.\nCRITICAL: The final prompt must be written exclusively in English.",
        Language::Ko => "다른 언어를 섞지 마세요.\n매우 중요: 최종 프롬프트는 반드시 한국어로만 작성해야 합니다.",
    }
}

/// Builds the instruction text for the video-prompt model.
///
/// Paragraph order: core instruction, constraint list, media assets (only
/// when something is attached), output format, the sketch in a fenced block,
/// language directive. The result depends on the three inputs only.
pub fn compile(code: &str, options: &GenerationOptions, media: &MediaAssetFlags) -> String {
    let lang = options.prompt_language.locale();
    let t = |key: &'static str| -> &'static str { lang.t(key) };

    let mut constraints = vec![t("prompt_constraints_header").to_string()];

    let aspects: Vec<&str> = ANALYSIS_FLAGS
        .iter()
        .filter(|(field, _)| options.flag(*field).unwrap_or(false))
        .map(|&(_, key)| t(key))
        .collect();
    if !aspects.is_empty() {
        constraints.push(format!("- {}: {}.", t("prompt_analysis_aspects"), aspects.join(LIST_SEPARATOR)));
    }

    constraints.push(format!("- {} {} {}.", t("prompt_video_duration"), options.video_duration, t("prompt_seconds")));
    constraints.push(format!("- {} {}.", t("prompt_aspect_ratio"), options.aspect_ratio.as_str()));
    constraints.push(format!("- {} {}.", t("prompt_detail_level"), t(options.prompt_detail.label_key())));
    constraints.push(format!("- {} {}.", t("prompt_camera_angle"), t(options.camera_angle.label_key())));
    if options.enable_denoising {
        constraints.push(format!("- {}.", t("prompt_denoising")));
    }

    if options.style_none {
        constraints.push(format!("- {}.", t("prompt_no_style")));
    } else {
        let mut effects = Vec::new();
        if options.relaxing_ambient {
            effects.push(t("style_relaxing_ambient"));
        }
        if options.glitchy_sfx {
            effects.push(t("style_glitchy_sfx"));
        }
        if !effects.is_empty() {
            constraints.push(format!("- {}: {}.", t("prompt_style_elements"), effects.join(LIST_SEPARATOR)));
        }
        constraints.push(format!("- {} '{}'.", t("prompt_music_style"), t(options.default_music.label_key())));
        constraints.push(format!("- {} '{}'.", t("prompt_palette_style"), t(options.default_palette.label_key())));
    }

    let mut sections = vec![core_instruction(lang).to_string(), constraints.join("\n")];

    if media.any() {
        let mut lines = vec![format!("{}:", t("prompt_media_header"))];
        for (present, key) in [
            (media.has_image, "prompt_media_image"),
            (media.has_video, "prompt_media_video"),
            (media.has_audio, "prompt_media_audio"),
        ] {
            if present {
                lines.push(format!("- {}.", t(key)));
            }
        }
        sections.push(lines.join("\n"));
    }

    sections.push(t("prompt_output_format").to_string());
    sections.push(format!("{}:\n```javascript\n{}\n```", t("prompt_code_header"), code));
    sections.push(language_directive(lang).to_string());

    sections.join("\n\n").trim().to_string()
}

/// Compiled prompt plus its system preamble, ready for the gateway.
pub fn generation_request(
    code: &str,
    options: &GenerationOptions,
    media: &MediaAssetFlags,
    params: ModelParams,
) -> GenerateRequest {
    GenerateRequest {
        tier: ModelTier::Pro,
        instruction: Instruction {
            system: system_instruction(options.prompt_language.locale()).to_string(),
            user: compile(code, options, media),
        },
        params: Some(params),
        response_schema: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{contains, resolve};
    use crate::options::{CameraAngle, MusicStyle, Palette, PromptDetail, PromptLanguage};

    const CODE: &str = "function setup(){}";

    fn korean() -> GenerationOptions {
        GenerationOptions { prompt_language: PromptLanguage::Korean, ..GenerationOptions::default() }
    }

    #[test]
    fn compile_is_deterministic() {
        let opts = GenerationOptions { organic: true, relaxing_ambient: true, ..Default::default() };
        let media = MediaAssetFlags { has_video: true, ..Default::default() };
        assert_eq!(compile(CODE, &opts, &media), compile(CODE, &opts, &media));
    }

    #[test]
    fn english_defaults_round_trip() {
        let out = compile(CODE, &GenerationOptions::default(), &MediaAssetFlags::default());
        assert!(out.starts_with(core_instruction_en()));
        assert!(out.contains("- The final video should be approximately 10 seconds long."));
        assert!(out.contains("- The aspect ratio should be 16:9."));
        assert!(out.contains("- The level of detail in the prompt should be Medium."));
        assert!(out.contains("- The camera angle should be Frontal."));
        assert!(out.contains("- Focus on these analysis aspects: Extract Shapes & Colors, Detect Animation."));
        assert!(out.contains("- The music should fit a 'Calm Piano'."));
        assert!(out.contains("- The color palette should be based on a 'Pastel'."));
        assert!(out.contains("```javascript\nfunction setup(){}\n```"));
        assert!(out.ends_with("\nCRITICAL: The final prompt must be written exclusively in English."));
        assert!(out.contains("Do not mix languages."));
        assert!(!out.contains("media assets"));
    }

    #[test]
    fn korean_output_stays_korean() {
        let out = compile(CODE, &korean(), &MediaAssetFlags::default());
        assert!(out.starts_with(core_instruction_ko()));
        assert!(out.ends_with("\n매우 중요: 최종 프롬프트는 반드시 한국어로만 작성해야 합니다."));
        assert!(out.contains("- 최종 비디오 길이는 약 10 초여야 합니다."));
        assert!(out.contains("- 음악은 '잔잔한 피아노'."));
        for key in [
            "prompt_constraints_header",
            "prompt_analysis_aspects",
            "prompt_video_duration",
            "prompt_seconds",
            "prompt_aspect_ratio",
            "prompt_detail_level",
            "prompt_camera_angle",
            "prompt_music_style",
            "prompt_palette_style",
            "prompt_output_format",
            "prompt_code_header",
            "analysis_shapes_colors",
            "detail_medium",
            "angle_frontal",
            "music_calm_piano",
            "palette_pastel",
        ] {
            let english = resolve(Language::En, key);
            assert!(!out.contains(english), "korean prompt leaked {english:?}");
        }
        assert!(!out.contains("CRITICAL"));
    }

    #[test]
    fn style_none_suppresses_every_style_clause() {
        let opts = GenerationOptions {
            style_none: true,
            relaxing_ambient: true,
            glitchy_sfx: true,
            default_music: MusicStyle::Synthwave,
            default_palette: Palette::Vibrant,
            ..Default::default()
        };
        let out = compile(CODE, &opts, &MediaAssetFlags::default());
        for marker in [
            "The music should fit a",
            "The color palette should be based on a",
            "Relaxing Ambient",
            "Glitchy SFX",
            "Synthwave",
            "Vibrant",
            "Incorporate the following style elements",
        ] {
            assert!(!out.contains(marker), "found {marker:?}");
        }
        assert!(out.contains("- Do not include any specific style, music, or color palette suggestions."));
    }

    #[test]
    fn style_effects_listed_when_enabled() {
        let opts = GenerationOptions { relaxing_ambient: true, glitchy_sfx: true, ..Default::default() };
        let out = compile(CODE, &opts, &MediaAssetFlags::default());
        assert!(out.contains("- Incorporate the following style elements: Relaxing Ambient, Glitchy SFX."));
        let effects = out.find("Incorporate").unwrap();
        assert!(effects < out.find("The music should fit a").unwrap());
    }

    #[test]
    fn no_analysis_flags_means_no_aspects_clause() {
        let opts = GenerationOptions { extract_shapes_colors: false, detect_animation: false, ..Default::default() };
        let out = compile(CODE, &opts, &MediaAssetFlags::default());
        assert!(!out.contains("Focus on these analysis aspects"));
        assert!(!out.contains(": ."));
    }

    #[test]
    fn analysis_flags_follow_declared_order() {
        let opts = GenerationOptions {
            extract_shapes_colors: false,
            detect_animation: false,
            upbeat_electronic: true,
            interpret_functions: true,
            organic: true,
            ..Default::default()
        };
        let out = compile(CODE, &opts, &MediaAssetFlags::default());
        assert!(out.contains(
            "- Focus on these analysis aspects: Interpret Functions/Variables, Organic, Upbeat Electronic Shot."
        ));
    }

    #[test]
    fn media_clauses_in_fixed_order() {
        let media = MediaAssetFlags { has_image: true, has_video: true, has_audio: true };
        let out = compile(CODE, &GenerationOptions::default(), &media);
        let header = out.find("The user has also provided the following media assets").unwrap();
        let image = out.find("- An image file.").unwrap();
        let video = out.find("- A video file.").unwrap();
        let audio = out.find("- An audio file.").unwrap();
        assert!(header < image && image < video && video < audio);
        assert!(audio < out.find("```javascript").unwrap());
    }

    #[test]
    fn single_media_flag_emits_only_its_clause() {
        let media = MediaAssetFlags { has_audio: true, ..Default::default() };
        let out = compile(CODE, &GenerationOptions::default(), &media);
        assert!(out.contains("- An audio file."));
        assert!(!out.contains("- An image file."));
        assert!(!out.contains("- A video file."));
    }

    #[test]
    fn denoising_clause_is_optional() {
        let plain = compile(CODE, &GenerationOptions::default(), &MediaAssetFlags::default());
        assert!(!plain.contains("denoised"));
        let opts = GenerationOptions { enable_denoising: true, ..Default::default() };
        let out = compile(CODE, &opts, &MediaAssetFlags::default());
        assert!(out.contains("- The final video should have a clean, denoised look."));
    }

    #[test]
    fn choice_values_are_localized() {
        let opts = GenerationOptions {
            prompt_detail: PromptDetail::Detailed,
            camera_angle: CameraAngle::WormsEye,
            ..korean()
        };
        let out = compile(CODE, &opts, &MediaAssetFlags::default());
        assert!(out.contains("- 프롬프트의 상세 수준은 상세함."));
        assert!(out.contains("- 카메라 앵글은 웜즈 아이."));
    }

    #[test]
    fn duration_and_code_pass_through_verbatim() {
        let opts = GenerationOptions { video_duration: "abc".into(), ..Default::default() };
        let code = "let s = `<b>` + \"\\n\";";
        let out = compile(code, &opts, &MediaAssetFlags::default());
        assert!(out.contains("approximately abc seconds long"));
        assert!(out.contains(code));
    }

    #[test]
    fn empty_code_still_compiles() {
        let out = compile("", &GenerationOptions::default(), &MediaAssetFlags::default());
        assert!(out.contains("```javascript\n\n```"));
    }

    #[test]
    fn compiler_keys_exist_in_both_tables() {
        let mut keys = vec![
            "prompt_constraints_header",
            "prompt_analysis_aspects",
            "prompt_video_duration",
            "prompt_seconds",
            "prompt_aspect_ratio",
            "prompt_detail_level",
            "prompt_camera_angle",
            "prompt_denoising",
            "prompt_style_elements",
            "prompt_music_style",
            "prompt_palette_style",
            "prompt_no_style",
            "prompt_media_header",
            "prompt_media_image",
            "prompt_media_video",
            "prompt_media_audio",
            "prompt_output_format",
            "prompt_code_header",
            "style_relaxing_ambient",
            "style_glitchy_sfx",
        ];
        keys.extend(ANALYSIS_FLAGS.iter().map(|(_, k)| *k));
        keys.extend(PromptDetail::ALL.iter().map(|c| c.label_key()));
        keys.extend(CameraAngle::ALL.iter().map(|c| c.label_key()));
        keys.extend(MusicStyle::ALL.iter().map(|c| c.label_key()));
        keys.extend(Palette::ALL.iter().map(|c| c.label_key()));
        for key in keys {
            assert!(contains(Language::En, key), "en missing {key}");
            assert!(contains(Language::Ko, key), "ko missing {key}");
        }
    }

    #[test]
    fn generation_request_carries_matching_preamble() {
        let req = generation_request(CODE, &korean(), &MediaAssetFlags::default(), ModelParams::new(0.8, Some(0.9)));
        assert_eq!(req.tier, ModelTier::Pro);
        assert_eq!(req.instruction.system, system_instruction_ko());
        assert!(!req.is_structured());
        assert_eq!(req.params, Some(ModelParams::new(0.8, Some(0.9))));
    }
}
