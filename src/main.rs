use anyhow::Result;
use clap::Parser;
use uuid::Uuid;

mod cli;
mod config;
mod errors;
mod i18n;
mod log;
mod options;
mod prompt;
mod provider;
mod recommend;
mod rewrite;
mod session;
mod ux;
mod wire;

use cli::{Args, Command};
use config::Config;
use errors::KineticError;
use session::{Exchange, Flow, Session};

fn build_config(args: &Args) -> Result<Config> {
    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(kind) = args.provider {
        cfg = cfg.with_provider(kind);
    }
    if let Some(m) = &args.pro_model {
        cfg.pro_model = m.clone();
    }
    if let Some(m) = &args.flash_model {
        cfg.flash_model = m.clone();
    }
    if let Some(t) = args.timeout_secs {
        cfg.timeout_secs = t;
    }
    if let Some(lang) = args.ui_language {
        cfg.ui_language = lang;
    }
    cfg.save_artifacts |= args.save_artifacts;
    Ok(cfg)
}

/// Stops the spinner, records artifacts, and reports a failure in the UI language.
fn finish(
    flow: Flow,
    outcome: Result<Exchange, KineticError>,
    pb: indicatif::ProgressBar,
    tx: Uuid,
    cfg: &Config,
    debug: bool,
) -> Result<Exchange> {
    pb.finish_and_clear();
    let ex = match outcome {
        Ok(ex) => ex,
        Err(e) => {
            ux::print_error(cfg.ui_language, flow, &e);
            return Err(e.into());
        }
    };
    if cfg.save_artifacts {
        let saved = log::save_stage(ex.stage, &ex.request, &ex.response, tx, cfg)?;
        if debug {
            log::print_saved_paths(ex.stage, &saved);
        }
    }
    Ok(ex)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    log::init(args.debug);

    let cfg = build_config(&args)?;
    let lang = cfg.ui_language;
    let tx = Uuid::new_v4();
    tracing::debug!(%tx, provider = ?cfg.provider, pro = %cfg.pro_model, flash = %cfg.flash_model, "starting");

    match &args.command {
        Command::Compile { sketch, show_system } => {
            let opts = sketch.opts.resolve()?;
            let code = sketch.read_code()?;
            if *show_system {
                println!("{}\n", prompt::system_instruction(opts.prompt_language.locale()));
            }
            println!("{}", prompt::compile(&code, &opts, &sketch.media()));
        }
        Command::Generate { sketch } => {
            let gateway = provider::make_provider(&cfg)?;
            let mut s = Session::new(sketch.read_code()?, sketch.opts.resolve()?, sketch.media());
            let pb = ux::spinner(lang);
            let outcome = s.generate(gateway.as_ref(), &cfg).await;
            finish(Flow::Generate, outcome, pb, tx, &cfg, args.debug)?;
            ux::print_result(lang, "prompt_output_title", s.result.as_deref().unwrap_or_default());
        }
        Command::Recommend { sketch, kind, write } => {
            let gateway = provider::make_provider(&cfg)?;
            let mut s = Session::new(sketch.read_code()?, sketch.opts.resolve()?, sketch.media());
            let pb = ux::spinner(lang);
            let outcome = s.recommend(gateway.as_ref(), *kind).await;
            finish(Flow::Recommend(*kind), outcome, pb, tx, &cfg, args.debug)?;
            ux::print_options(lang, &s.options);
            if let Some(path) = write {
                cli::write_options(path, &s.options)?;
                tracing::info!(path = %path.display(), "options written");
            }
        }
        Command::Vary { kind, prompt, prompt_file, opts } => {
            let existing = match (prompt, prompt_file) {
                (Some(p), _) => p.clone(),
                (None, Some(path)) => cli::read_text(path)?,
                (None, None) => cli::read_text(std::path::Path::new("-"))?,
            };
            let gateway = provider::make_provider(&cfg)?;
            let mut s = Session::new(String::new(), opts.resolve()?, Default::default());
            s.result = Some(existing.trim().to_string()).filter(|p| !p.is_empty());
            let pb = ux::spinner(lang);
            let outcome = s.vary(gateway.as_ref(), *kind, &cfg).await;
            finish(Flow::Vary, outcome, pb, tx, &cfg, args.debug)?;
            ux::print_result(lang, "prompt_output_title", s.result.as_deref().unwrap_or_default());
        }
        Command::Assist { sketch, kind } => {
            let gateway = provider::make_provider(&cfg)?;
            let s = Session::new(sketch.read_code()?, sketch.opts.resolve()?, sketch.media());
            let pb = ux::spinner(lang);
            let outcome = s.assist(gateway.as_ref(), *kind, &cfg).await;
            let ex = finish(Flow::Assist, outcome, pb, tx, &cfg, args.debug)?;
            ux::print_result(lang, kind.title_key(), &ex.response);
        }
        Command::Options { opts, reset, write } => {
            let mut s = Session::new(String::new(), opts.resolve()?, Default::default());
            if *reset {
                s.reset();
            }
            ux::print_options(lang, &s.options);
            if let Some(path) = write {
                cli::write_options(path, &s.options)?;
                tracing::info!(path = %path.display(), "options written");
            }
        }
    }
    Ok(())
}
