use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Vocabulary languages, serialized as `en` and `ko`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ko,
}

impl Language {
    /// Shorthand for [`resolve`] bound to this language.
    pub fn t<'a>(self, key: &'a str) -> &'a str {
        resolve(self, key)
    }
}

/// Looks `key` up in the table for `lang`. A missing key resolves to itself,
/// so an untranslated string shows up as its key instead of failing.
pub fn resolve<'a>(lang: Language, key: &'a str) -> &'a str {
    table(lang).get(key).copied().unwrap_or(key)
}

/// Whether `key` has an entry for `lang` (no fallback).
#[cfg(test)]
pub fn contains(lang: Language, key: &str) -> bool {
    table(lang).contains_key(key)
}

fn table(lang: Language) -> &'static HashMap<&'static str, &'static str> {
    static EN_TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static KO_TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match lang {
        Language::En => EN_TABLE.get_or_init(|| EN.iter().copied().collect()),
        Language::Ko => KO_TABLE.get_or_init(|| KO.iter().copied().collect()),
    }
}

const EN: &[(&str, &str)] = &[
    // header
    ("header_title", "Kinetic Prompt"),
    ("header_subtitle", "Paste your P5.js sketch code to generate cinematic video prompts for your animations."),
    ("toggle_language_title", "Change language"),
    // code input
    ("code_input_title", "P5.js Sketch Code"),
    ("clear_code_button", "Clear Code"),
    ("reset_all_button", "Reset All"),
    // generation options
    ("generation_options_title", "Generation Options"),
    ("ai_recommendation_button", "AI Suggest"),
    ("ai_recommendation_tooltip", "Get AI recommendations"),
    ("options_analysis_title", "Prompt Analysis"),
    ("analysis_shapes_colors", "Extract Shapes & Colors"),
    ("analysis_animation", "Detect Animation"),
    ("analysis_interpret_functions", "Interpret Functions/Variables"),
    ("analysis_interpret_custom_functions", "Interpret Custom Functions/Variables"),
    ("analysis_abstract", "Abstract Animation"),
    ("analysis_geometric_music", "Geometric Music"),
    ("analysis_organic", "Organic"),
    ("analysis_upbeat", "Upbeat Electronic Shot"),
    ("options_video_title", "Video Settings"),
    ("video_duration_label", "Video Duration (sec)"),
    ("video_aspect_ratio_label", "Aspect Ratio"),
    ("aspect_ratio_16_9", "16:9 (Landscape)"),
    ("aspect_ratio_9_16", "9:16 (Portrait)"),
    ("aspect_ratio_1_1", "1:1 (Square)"),
    ("aspect_ratio_4_3", "4:3 (Standard)"),
    ("video_prompt_detail_label", "Prompt Detail"),
    ("video_camera_angle_label", "Camera Angle"),
    ("video_prompt_language_label", "Prompt Language"),
    ("video_denoising_label", "Enable Denoising"),
    ("options_style_title", "Style Suggestion"),
    ("style_music_label", "Default Music"),
    ("style_palette_label", "Default Palette"),
    ("style_relaxing_ambient", "Relaxing Ambient"),
    ("style_glitchy_sfx", "Glitchy SFX"),
    ("style_none", "None (No style suggestion)"),
    // actions and output
    ("generate_prompt_button", "Generate Video Prompt"),
    ("generating", "Generating..."),
    ("prompt_output_title", "Generated Video Prompt"),
    ("generating_prompt_message", "Generating prompt..."),
    ("prompt_output_placeholder", "Your generated video prompt will appear here."),
    ("prompt_assets_title", "Prompt Assets"),
    ("asset_image", "Image"),
    ("asset_video", "Video"),
    ("asset_music", "Music"),
    ("footer_powered_by", "Powered by Gemini"),
    // errors
    ("error_title", "Error"),
    ("error_code_empty", "P5.js code cannot be empty."),
    ("error_generation_failed", "Failed to generate prompt. Please check your API key and network connection."),
    ("error_ai_recommendation", "Failed to get AI recommendations: "),
    ("error_no_prompt", "There is no video prompt to rewrite yet. Generate one first."),
    ("error_variation_failed", "Failed to rewrite the prompt. Please check your API key and network connection."),
    ("error_code_assist_failed", "Failed to get code assistance. Please check your API key and network connection."),
    ("code_explanation_title", "Code Explanation"),
    // prompt template
    ("prompt_constraints_header", "Please adhere to the following constraints when generating the prompt:"),
    ("prompt_analysis_aspects", "Focus on these analysis aspects"),
    ("prompt_video_duration", "The final video should be approximately"),
    ("prompt_seconds", "seconds long"),
    ("prompt_aspect_ratio", "The aspect ratio should be"),
    ("prompt_detail_level", "The level of detail in the prompt should be"),
    ("prompt_camera_angle", "The camera angle should be"),
    ("prompt_denoising", "The final video should have a clean, denoised look"),
    ("prompt_style_elements", "Incorporate the following style elements"),
    ("prompt_music_style", "The music should fit a"),
    ("prompt_palette_style", "The color palette should be based on a"),
    ("prompt_no_style", "Do not include any specific style, music, or color palette suggestions"),
    ("prompt_media_header", "The user has also provided the following media assets. Your prompt should incorporate and reference them"),
    ("prompt_media_image", "An image file. Describe how this image can be used as a style reference, background, or starting frame"),
    ("prompt_media_video", "A video file. Describe how this video's motion, style, or content can influence the generated animation"),
    ("prompt_media_audio", "An audio file. Describe how the animation should sync with the provided music's rhythm, mood, or specific sound cues"),
    ("prompt_output_format", "The output should be a single, cohesive paragraph, ready to be used in a text-to-video model."),
    ("prompt_code_header", "Here is the P5.js code"),
    // option values
    ("detail_low", "Low"),
    ("detail_medium", "Medium"),
    ("detail_high", "High"),
    ("detail_detailed", "Detailed"),
    ("angle_frontal", "Frontal"),
    ("angle_top_down", "Top-down"),
    ("angle_isometric", "Isometric"),
    ("angle_worms_eye", "Worm's eye"),
    ("angle_birds_eye", "Bird's eye"),
    ("angle_wide_shot", "Wide Shot"),
    ("music_calm_piano", "Calm Piano"),
    ("music_smooth_jazz", "Smooth Jazz"),
    ("music_synthwave", "Synthwave"),
    ("music_chillhop", "Chillhop"),
    ("palette_pastel", "Pastel"),
    ("palette_monochromatic", "Monochromatic"),
    ("palette_vibrant", "Vibrant"),
    ("palette_earthy", "Earthy"),
    ("language_english", "English"),
    ("language_korean", "Korean"),
];

const KO: &[(&str, &str)] = &[
    // header
    ("header_title", "Kinetic Prompt"),
    ("header_subtitle", "P5.js 스케치 코드를 붙여넣어 당신의 애니메이션을 위한 영화 같은 비디오 프롬프트를 생성하세요."),
    ("toggle_language_title", "언어 변경"),
    // code input
    ("code_input_title", "P5.js 스케치 코드"),
    ("clear_code_button", "코드 지우기"),
    ("reset_all_button", "전체 초기화"),
    // generation options
    ("generation_options_title", "생성 옵션"),
    ("ai_recommendation_button", "AI 추천"),
    ("ai_recommendation_tooltip", "AI로 추천받기"),
    ("options_analysis_title", "프롬프트 분석"),
    ("analysis_shapes_colors", "도형 및 색상 추출"),
    ("analysis_animation", "애니메이션 감지"),
    ("analysis_interpret_functions", "함수/변수 해석"),
    ("analysis_interpret_custom_functions", "사용자 정의 함수/변수 해석"),
    ("analysis_abstract", "추상적인 애니메이션"),
    ("analysis_geometric_music", "기하학적 음악"),
    ("analysis_organic", "유기적인"),
    ("analysis_upbeat", "경쾌한 전자음악 풍"),
    ("options_video_title", "비디오 설정"),
    ("video_duration_label", "비디오 길이 (초)"),
    ("video_aspect_ratio_label", "화면 비율"),
    ("aspect_ratio_16_9", "16:9 (가로)"),
    ("aspect_ratio_9_16", "9:16 (세로)"),
    ("aspect_ratio_1_1", "1:1 (정방형)"),
    ("aspect_ratio_4_3", "4:3 (표준)"),
    ("video_prompt_detail_label", "프롬프트 상세도"),
    ("video_camera_angle_label", "카메라 앵글"),
    ("video_prompt_language_label", "프롬프트 언어"),
    ("video_denoising_label", "노이즈 제거 활성화"),
    ("options_style_title", "스타일 제안"),
    ("style_music_label", "기본 음악"),
    ("style_palette_label", "기본 팔레트"),
    ("style_relaxing_ambient", "편안한 앰비언트"),
    ("style_glitchy_sfx", "글리치 효과음"),
    ("style_none", "스타일 제안 없음"),
    // actions and output
    ("generate_prompt_button", "비디오 프롬프트 생성"),
    ("generating", "생성 중..."),
    ("prompt_output_title", "생성된 비디오 프롬프트"),
    ("generating_prompt_message", "프롬프트 생성 중..."),
    ("prompt_output_placeholder", "생성된 비디오 프롬프트가 여기에 표시됩니다."),
    ("prompt_assets_title", "프롬프트 에셋"),
    ("asset_image", "이미지"),
    ("asset_video", "비디오"),
    ("asset_music", "음악"),
    ("footer_powered_by", "Gemini 제공"),
    // errors
    ("error_title", "오류"),
    ("error_code_empty", "P5.js 코드는 비워둘 수 없습니다."),
    ("error_generation_failed", "프롬프트 생성에 실패했습니다. API 키와 네트워크 연결을 확인해주세요."),
    ("error_ai_recommendation", "AI 추천을 받아오는 데 실패했습니다: "),
    ("error_no_prompt", "아직 다시 작성할 비디오 프롬프트가 없습니다. 먼저 생성해주세요."),
    ("error_variation_failed", "프롬프트 변형에 실패했습니다. API 키와 네트워크 연결을 확인해주세요."),
    ("error_code_assist_failed", "코드 도움을 받는 데 실패했습니다. API 키와 네트워크 연결을 확인해주세요."),
    ("code_explanation_title", "코드 설명"),
    // prompt template
    ("prompt_constraints_header", "프롬프트 생성 시 다음 제약 조건을 준수해 주세요:"),
    ("prompt_analysis_aspects", "다음 분석 측면에 집중하세요"),
    ("prompt_video_duration", "최종 비디오 길이는 약"),
    ("prompt_seconds", "초여야 합니다"),
    ("prompt_aspect_ratio", "화면 비율은"),
    ("prompt_detail_level", "프롬프트의 상세 수준은"),
    ("prompt_camera_angle", "카메라 앵글은"),
    ("prompt_denoising", "최종 비디오는 깨끗하고 노이즈가 없는 모습이어야 합니다"),
    ("prompt_style_elements", "다음 스타일 요소를 통합하세요"),
    ("prompt_music_style", "음악은"),
    ("prompt_palette_style", "색상 팔레트는"),
    ("prompt_no_style", "특정 스타일, 음악 또는 색상 팔레트 제안을 포함하지 마세요"),
    ("prompt_media_header", "사용자가 다음 미디어 에셋도 제공했습니다. 프롬프트에 이를 통합하고 참조해야 합니다"),
    ("prompt_media_image", "이미지 파일. 이 이미지를 스타일 참조, 배경 또는 시작 프레임으로 사용하는 방법을 설명하세요"),
    ("prompt_media_video", "비디오 파일. 이 비디오의 움직임, 스타일 또는 콘텐츠가 생성될 애니메이션에 어떻게 영향을 미칠 수 있는지 설명하세요"),
    ("prompt_media_audio", "오디오 파일. 제공된 음악의 리듬, 분위기 또는 특정 사운드 큐에 애니메이션을 어떻게 동기화해야 하는지 설명하세요"),
    ("prompt_output_format", "출력은 텍스트-비디오 모델에서 바로 사용할 수 있는 단일하고 응집력 있는 단락이어야 합니다."),
    ("prompt_code_header", "P5.js 코드는 다음과 같습니다"),
    // option values
    ("detail_low", "낮음"),
    ("detail_medium", "중간"),
    ("detail_high", "높음"),
    ("detail_detailed", "상세함"),
    ("angle_frontal", "정면"),
    ("angle_top_down", "탑다운"),
    ("angle_isometric", "아이소메트릭"),
    ("angle_worms_eye", "웜즈 아이"),
    ("angle_birds_eye", "버드 아이"),
    ("angle_wide_shot", "와이드 샷"),
    ("music_calm_piano", "잔잔한 피아노"),
    ("music_smooth_jazz", "부드러운 재즈"),
    ("music_synthwave", "신스웨이브"),
    ("music_chillhop", "칠합"),
    ("palette_pastel", "파스텔"),
    ("palette_monochromatic", "단색"),
    ("palette_vibrant", "생생한"),
    ("palette_earthy", "얼씨"),
    ("language_english", "영어"),
    ("language_korean", "한국어"),
];
