//! Markdown checkbox tasks embedded in freeform text.
//!
//! Lines of the form `- [ ] label` or `- [X] label` are extracted with their
//! byte spans, edited, and written back at the same spans. Spans are only
//! meaningful against the exact text they were extracted from; applying them
//! to any other text yields garbage. [`TaskList`] records a digest of the
//! source so that mismatch is caught instead.

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Upper-case X only; lowercase x is not a task.
static TASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-[ \t]+\[([ X])\][ \t]+([^\r\n]*)").expect("task pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub index: usize,
    pub title: String,
    pub is_checked: bool,
    pub original_line: String,
    /// Byte offset of `original_line` in the parsed source.
    pub start_index: usize,
    pub end_index: usize,
}

impl Task {
    /// `-   [X] title`
    pub fn canonical_line(&self) -> String {
        let mark = if self.is_checked { 'X' } else { ' ' };
        format!("-   [{}] {}", mark, self.title)
    }
}

pub fn extract(source: &str) -> Vec<Task> {
    TASK_RE
        .captures_iter(source)
        .enumerate()
        .map(|(index, caps)| {
            let whole = caps.get(0).expect("group 0 always matches");
            Task {
                index,
                title: caps[2].trim().to_string(),
                is_checked: &caps[1] == "X",
                original_line: whole.as_str().to_string(),
                start_index: whole.start(),
                end_index: whole.end(),
            }
        })
        .collect()
}

/// Flip the task with `index`; an unknown index leaves everything unchanged.
pub fn toggle(tasks: &[Task], index: usize) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.index == index {
                Task { is_checked: !t.is_checked, ..t.clone() }
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Rewrite every task span in `source` with its canonical line.
///
/// `source` must be the exact text `tasks` were extracted from. Spans are
/// replaced right to left so each replacement leaves the offsets of the
/// remaining (earlier) spans intact.
pub fn apply(source: &str, tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return source.to_string();
    }
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| b.start_index.cmp(&a.start_index));

    let mut out = source.to_string();
    for task in ordered {
        let (start, end) = (task.start_index, task.end_index);
        if start > end || end > out.len() || !out.is_char_boundary(start) || !out.is_char_boundary(end) {
            tracing::warn!(index = task.index, start, end, "task span does not fit the source; skipped");
            continue;
        }
        out.replace_range(start..end, &task.canonical_line());
    }
    out
}

/// Tasks bound to the snapshot of text they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    source_digest: String,
    tasks: Vec<Task>,
}

fn digest(text: &str) -> String {
    format!("{:x}", md5::compute(text))
}

impl TaskList {
    pub fn parse(source: &str) -> Self {
        Self { source_digest: digest(source), tasks: extract(source) }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn checked_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_checked).count()
    }

    pub fn matches_source(&self, source: &str) -> bool {
        self.source_digest == digest(source)
    }

    /// Returns false when no task has `index`.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.tasks.iter_mut().find(|t| t.index == index) {
            Some(task) => {
                task.is_checked = !task.is_checked;
                true
            }
            None => false,
        }
    }

    pub fn set_checked(&mut self, index: usize, checked: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.index == index) {
            Some(task) => {
                task.is_checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn apply(&self, source: &str) -> Result<String> {
        if !self.matches_source(source) {
            bail!("stale task list: the source text changed since it was parsed");
        }
        Ok(apply(source, &self.tasks))
    }
}
