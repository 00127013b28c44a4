use crate::wizard::WizardState;
use anyhow::{Context, Result};
use dirs::data_dir;
use std::fs;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "prompt-wizard";
pub const STATE_FILE_NAME: &str = "wizard_state.json";

pub fn data_base_dir() -> Result<PathBuf> {
    let base = data_dir().context("unable to resolve OS data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

pub fn state_path() -> Result<PathBuf> {
    Ok(data_base_dir()?.join(STATE_FILE_NAME))
}

/// Saved answers, or a fresh state when nothing has been saved yet.
pub fn load_state() -> Result<WizardState> {
    let path = state_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no saved wizard state");
        return Ok(WizardState::default());
    }
    let text = fs::read_to_string(&path).with_context(|| format!("reading wizard state: {}", path.display()))?;
    let state = serde_json::from_str(&text).with_context(|| format!("failed to parse wizard state: {}", path.display()))?;
    Ok(state)
}

pub fn save_state(state: &WizardState) -> Result<PathBuf> {
    let path = state_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating data dir: {}", parent.display()))?;
    }
    let mut stamped = state.clone();
    stamped.saved_at = Some(chrono::Utc::now());
    let text = serde_json::to_string_pretty(&stamped).context("serializing wizard state")?;
    fs::write(&path, text).with_context(|| format!("writing wizard state: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wizard state saved");
    Ok(path)
}

/// Returns true when a saved state was removed.
pub fn reset_state() -> Result<bool> {
    let path = state_path()?;
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path).with_context(|| format!("removing wizard state: {}", path.display()))?;
    Ok(true)
}
