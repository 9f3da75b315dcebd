use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::errors::KineticError;
use crate::i18n::Language;
use crate::options::{Choice, GenerationOptions, ANALYSIS_FLAGS};
use crate::session::Flow;

/// Spinner shown on stderr while a model call is in flight.
pub fn spinner(lang: Language) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(lang.t("generating_prompt_message").to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_result(lang: Language, title_key: &str, body: &str) {
    println!("\n{}", format!("=== {} ===", lang.t(title_key)).bold());
    println!("{body}");
}

pub fn print_error(lang: Language, flow: Flow, err: &KineticError) {
    eprintln!("{} {}", format!("{}:", lang.t("error_title")).red().bold(), err.user_message(lang, flow));
}

fn mark(on: bool) -> colored::ColoredString {
    if on { "[x]".green() } else { "[ ]".normal() }
}

/// Options grouped as analysis, video, style.
pub fn render_options(lang: Language, o: &GenerationOptions) -> String {
    let mut out = Vec::new();
    let heading = |key: &str| format!("{}", lang.t(key).bold());
    let row = |key: &str, value: &str| format!("  {:<28} {}", lang.t(key), value);

    out.push(heading("options_analysis_title"));
    for (field, key) in ANALYSIS_FLAGS {
        out.push(format!("  {} {}", mark(o.flag(field).unwrap_or(false)), lang.t(key)));
    }

    out.push(heading("options_video_title"));
    out.push(format!("  {} {}", mark(o.enable_denoising), lang.t("video_denoising_label")));
    out.push(row("video_duration_label", &o.video_duration));
    out.push(row("video_prompt_detail_label", lang.t(o.prompt_detail.label_key())));
    out.push(row("video_camera_angle_label", lang.t(o.camera_angle.label_key())));
    out.push(row("video_aspect_ratio_label", lang.t(o.aspect_ratio.label_key())));
    out.push(row("video_prompt_language_label", lang.t(o.prompt_language.label_key())));

    out.push(heading("options_style_title"));
    out.push(format!("  {} {}", mark(o.style_none), lang.t("style_none")));
    let dim = |s: String| if o.style_none { s.dimmed().to_string() } else { s };
    out.push(dim(format!("  {} {}", mark(o.relaxing_ambient), lang.t("style_relaxing_ambient"))));
    out.push(dim(format!("  {} {}", mark(o.glitchy_sfx), lang.t("style_glitchy_sfx"))));
    out.push(dim(row("style_music_label", lang.t(o.default_music.label_key()))));
    out.push(dim(row("style_palette_label", lang.t(o.default_palette.label_key()))));

    out.join("\n")
}

pub fn print_options(lang: Language, o: &GenerationOptions) {
    println!("\n{}", format!("=== {} ===", lang.t("generation_options_title")).bold());
    println!("{}", render_options(lang, o));
}
