use crate::config::Config;
use crate::wire::GenerateRequest;
use anyhow::Context;
use chrono::Utc;
use fs_err as fs;
use serde_json::{json, to_string_pretty, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::Level;
use uuid::Uuid;

/// Installs the stderr subscriber; `--debug` lowers the level to DEBUG.
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: PathBuf,
    pub response: PathBuf,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join("tx").join(tx.to_string())
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, text: &str) -> anyhow::Result<()> {
    let dir = path.parent().context("artifact path has no parent")?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(path).with_context(|| format!("persisting {}", path.display()))?;
    Ok(())
}

/// Records one gateway exchange under `<artifacts_dir>/tx/<tx>/`.
/// A response that is itself JSON is stored as JSON, anything else as text.
pub fn save_stage(
    stage: &str,
    req: &GenerateRequest,
    response: &str,
    tx: Uuid,
    cfg: &Config,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(Path::new(&cfg.artifacts_dir), tx);
    fs::create_dir_all(&dir)?;
    let at = Utc::now().to_rfc3339();

    let request = dir.join(format!("{stage}.request.json"));
    let body = json!({
        "tx": tx,
        "stage": stage,
        "at": at,
        "provider": cfg.provider,
        "model": cfg.model_for(req.tier),
        "request": req,
    });
    write_atomic(&request, &to_string_pretty(&body)?)?;

    let response_path = dir.join(format!("{stage}.response.json"));
    let payload = serde_json::from_str::<Value>(response).unwrap_or_else(|_| Value::String(response.to_string()));
    let body = json!({ "tx": tx, "stage": stage, "at": at, "response": payload });
    write_atomic(&response_path, &to_string_pretty(&body)?)?;

    tracing::debug!(%tx, stage, dir = %dir.display(), "artifacts saved");
    Ok(SavedPaths { dir, request, response: response_path })
}

pub fn print_saved_paths(stage: &str, saved: &SavedPaths) {
    eprintln!("debug[{stage}]: artifacts directory: {}", saved.dir.display());
    eprintln!("debug[{stage}]: request saved at: {}", saved.request.display());
    eprintln!("debug[{stage}]: response saved at: {}", saved.response.display());
}
