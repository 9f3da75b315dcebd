use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::i18n::Language;
use crate::options::{GenerationOptions, MediaAssetFlags};
use crate::recommend::RecommendationKind;
use crate::rewrite::{CodeAssistKind, VariationKind};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name = "kinetic-prompt", version, about = "Compile P5.js sketches into text-to-video prompts")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file overlaid on the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub pro_model: Option<String>,

    #[arg(long, global = true)]
    pub flash_model: Option<String>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, global = true)]
    pub ui_language: Option<Language>,

    #[arg(long, global = true, default_value_t = false)]
    pub save_artifacts: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the compiled instruction without calling any model.
    Compile {
        #[command(flatten)]
        sketch: SketchArgs,
        #[arg(long, default_value_t = false)]
        show_system: bool,
    },
    /// Compile and send to the model; prints the video prompt.
    Generate {
        #[command(flatten)]
        sketch: SketchArgs,
    },
    /// Ask the model for one group of settings and merge them into the options.
    Recommend {
        #[command(flatten)]
        sketch: SketchArgs,
        #[arg(long, value_enum)]
        kind: RecommendationKind,
        /// Write the merged options here (format picked by extension).
        #[arg(long)]
        write: Option<PathBuf>,
    },
    /// Rewrite an existing video prompt in another style.
    Vary {
        #[arg(long, value_enum)]
        kind: VariationKind,
        #[arg(long, conflicts_with = "prompt_file")]
        prompt: Option<String>,
        #[arg(long)]
        prompt_file: Option<PathBuf>,
        #[command(flatten)]
        opts: OptionArgs,
    },
    /// Refactor, extend or explain the sketch itself.
    Assist {
        #[command(flatten)]
        sketch: SketchArgs,
        #[arg(long, value_enum)]
        kind: CodeAssistKind,
    },
    /// Show the effective options after loading and edits.
    Options {
        #[command(flatten)]
        opts: OptionArgs,
        /// Discard the loaded options and edits and start from the defaults.
        #[arg(long, default_value_t = false)]
        reset: bool,
        /// Write the effective options here (format picked by extension).
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct OptionArgs {
    /// Options document (.json, .yaml/.yml or .toml); missing fields use defaults.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Single-field edit, e.g. `--set styleNone=true` (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
}

impl OptionArgs {
    pub fn resolve(&self) -> Result<GenerationOptions> {
        let mut opts = load_options(self.options.as_deref())?;
        for edit in &self.set {
            let (name, value) = edit
                .split_once('=')
                .ok_or_else(|| anyhow!("--set expects FIELD=VALUE, got '{edit}'"))?;
            opts = opts.with_field_text(name.trim(), value.trim())?;
        }
        Ok(opts)
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct SketchArgs {
    /// Sketch source file; `-` reads stdin.
    #[arg(long, short = 'c')]
    pub code: PathBuf,

    #[command(flatten)]
    pub opts: OptionArgs,

    #[arg(long, default_value_t = false)]
    pub image: bool,

    #[arg(long, default_value_t = false)]
    pub video: bool,

    #[arg(long, default_value_t = false)]
    pub audio: bool,
}

impl SketchArgs {
    pub fn read_code(&self) -> Result<String> {
        read_text(&self.code)
    }

    pub fn media(&self) -> MediaAssetFlags {
        MediaAssetFlags { has_image: self.image, has_video: self.video, has_audio: self.audio }
    }
}

/// Reads a text file, or stdin when `path` is `-`.
pub fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s).context("reading stdin")?;
        return Ok(s);
    }
    Ok(fs::read_to_string(path)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocFormat {
    Json,
    Yaml,
    Toml,
}

fn doc_format(path: &Path) -> Result<DocFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "json" => Ok(DocFormat::Json),
        "yaml" | "yml" => Ok(DocFormat::Yaml),
        "toml" => Ok(DocFormat::Toml),
        _ => bail!("unsupported options format for {} (use .json, .yaml or .toml)", path.display()),
    }
}

pub fn load_options(path: Option<&Path>) -> Result<GenerationOptions> {
    let Some(path) = path else {
        return Ok(GenerationOptions::default());
    };
    let text = fs::read_to_string(path)?;
    let opts = match doc_format(path)? {
        DocFormat::Json => serde_json::from_str(&text)?,
        DocFormat::Yaml => serde_yaml::from_str(&text)?,
        DocFormat::Toml => toml::from_str(&text)?,
    };
    Ok(opts)
}

pub fn write_options(path: &Path, opts: &GenerationOptions) -> Result<()> {
    let text = match doc_format(path)? {
        DocFormat::Json => serde_json::to_string_pretty(opts)?,
        DocFormat::Yaml => serde_yaml::to_string(opts)?,
        DocFormat::Toml => toml::to_string_pretty(opts)?,
    };
    fs::write(path, text)?;
    Ok(())
}
