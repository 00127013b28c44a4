use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

use crate::wizard::{WizardState, WizardStep};

#[derive(Debug, Clone, Serialize)]
pub struct PromptTemplate {
    pub file_name: String,
    pub content: String,
}

pub async fn read_file_to_string_async(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading file: {}", path.display()))?;
    Ok(data)
}

/// Write text content to a file asynchronously
pub async fn write_file_async(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating directory: {}", parent.display()))?;
        }
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("writing file: {}", path.display()))?;
    Ok(())
}

pub async fn read_stdin_to_string_async() -> Result<String> {
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("reading stdin")?;
    Ok(buf)
}

pub fn template_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

pub async fn load_template(dir: &Path, file_name: &str) -> Result<PromptTemplate> {
    let path = template_path(dir, file_name);
    let content = read_file_to_string_async(&path)
        .await
        .with_context(|| format!("failed to load template: {}", file_name))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "template loaded");
    Ok(PromptTemplate { file_name: file_name.to_string(), content })
}

/// Template for `step`, honouring the selected code generation variant.
pub async fn load_step_template(dir: &Path, state: &WizardState, step: WizardStep) -> Result<PromptTemplate> {
    let Some(file_name) = state.template_file_for(step) else {
        bail!("invalid step '{}': it has no prompt template", step);
    };
    load_template(dir, file_name).await
}

/// Text behind a configured default: an http(s) URL, a `file://` URL, or a
/// plain path.
pub async fn fetch_default_text(location: &str, timeout: Duration) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        tracing::debug!(url = %location, "fetching default text");
        let resp = http
            .get(location)
            .send()
            .await
            .with_context(|| format!("failed to fetch default: {}", location))?;
        if !resp.status().is_success() {
            bail!("failed to fetch default {}: {}", location, resp.status());
        }
        return resp
            .text()
            .await
            .with_context(|| format!("failed to fetch default: {}", location));
    }
    let path = location.strip_prefix("file://").unwrap_or(location);
    read_file_to_string_async(Path::new(path)).await
}
