use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::tokens::DEFAULT_HIGH_TOKEN_THRESHOLD;
use crate::wizard::AnswerField;

pub const APP_DIR_NAME: &str = "prompt-wizard";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Directory holding prompt1.md .. prompt5.md
    pub templates_dir: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    /// Token counts above this are flagged as high.
    pub token_threshold: Option<usize>,
    /// URL or path of the text `state load-default projectRules` loads.
    pub project_rules_default_url: Option<String>,
    pub starter_template_default_url: Option<String>,
}

pub fn default_config_path() -> Result<PathBuf> {
    let base = config_dir().context("unable to resolve OS config directory")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn ensure_config_parent_exists(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating config dir: {}", parent.display()))?;
    }
    Ok(())
}

pub fn load_config_if_exists(path: &PathBuf) -> Result<Option<AppConfig>> {
    if path.exists() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        let cfg: AppConfig = toml::from_str(&text).context("failed to parse config TOML")?;
        Ok(Some(cfg))
    } else {
        Ok(None)
    }
}

pub fn write_config(path: &PathBuf, cfg: &AppConfig) -> Result<()> {
    ensure_config_parent_exists(path)?;
    let text = toml::to_string_pretty(cfg).context("serializing config to TOML")?;
    fs::write(path, text).with_context(|| format!("writing config file: {}", path.display()))?;
    Ok(())
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub templates_dir: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    pub templates_dir: PathBuf,
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base: String,
    pub token_threshold: usize,
    pub project_rules_default_url: Option<String>,
    pub starter_template_default_url: Option<String>,
}

impl EffectiveSettings {
    /// Where the default text for `field` is loaded from, if configured.
    pub fn default_source(&self, field: AnswerField) -> Option<&str> {
        let url = match field {
            AnswerField::ProjectRules => self.project_rules_default_url.as_deref(),
            AnswerField::StarterTemplate => self.starter_template_default_url.as_deref(),
            _ => None,
        };
        url.filter(|u| !u.trim().is_empty())
    }
}

pub fn resolve_effective_settings(overrides: &Overrides) -> Result<EffectiveSettings> {
    dotenvy::dotenv().ok();
    let path = default_config_path()?;
    let cfg = load_config_if_exists(&path)?.unwrap_or_default();
    let env_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
    Ok(merge_settings(cfg, overrides, env_key))
}

pub fn merge_settings(cfg: AppConfig, overrides: &Overrides, env_key: Option<String>) -> EffectiveSettings {
    EffectiveSettings {
        templates_dir: overrides
            .templates_dir
            .clone()
            .or(cfg.templates_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR)),
        provider: overrides
            .provider
            .clone()
            .or(cfg.provider)
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
        model: overrides
            .model
            .clone()
            .or(cfg.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        api_key: cfg.api_key.or(env_key),
        api_base: cfg.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        token_threshold: cfg.token_threshold.unwrap_or(DEFAULT_HIGH_TOKEN_THRESHOLD),
        project_rules_default_url: cfg.project_rules_default_url,
        starter_template_default_url: cfg.starter_template_default_url,
    }
}
