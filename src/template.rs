//! `{{NAME}}` placeholder substitution.
//!
//! Substitution resolves every placeholder against the original template in a
//! single scan. Inserted values are never rescanned, so user content that
//! happens to contain `{{...}}` is emitted verbatim.

use anyhow::{bail, Context, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("placeholder pattern is valid"));

/// Placeholder name to replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateData {
    values: BTreeMap<String, String>,
}

pub fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_uppercase() || b == b'_')
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !is_placeholder_name(&name) {
            bail!("invalid placeholder name '{}': expected [A-Z_]+", name);
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `KEY=VALUE` assignments on top of the current values.
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[S]) -> Result<()> {
        for raw in assignments {
            let raw = raw.as_ref();
            let (key, value) = raw
                .split_once('=')
                .with_context(|| format!("invalid assignment '{}': expected KEY=VALUE", raw))?;
            self.insert(key.trim(), value)?;
        }
        Ok(())
    }
}

/// Replace every `{{NAME}}` whose name is in `data`; unknown names pass through.
pub fn substitute(template: &str, data: &TemplateData) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match data.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let name = &caps[1];
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

pub fn unresolved(template: &str, data: &TemplateData) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|name| !data.contains(name))
        .collect()
}
