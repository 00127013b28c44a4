//! Advisory token counts for prompts, using the cl100k BPE vocabulary.
//!
//! Counting never fails; callers get a number even when the encoder is
//! unavailable.

use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use serde::Serialize;
use tiktoken_rs::CoreBPE;

/// Counts above this are shown as "high" by default.
pub const DEFAULT_HIGH_TOKEN_THRESHOLD: usize = 30_000;

static ENCODER: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn encoder() -> Option<&'static CoreBPE> {
    ENCODER
        .get_or_init(|| match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                tracing::warn!("cl100k encoder unavailable, using character estimate: {e}");
                None
            }
        })
        .as_ref()
}

/// Number of model tokens `text` would consume.
///
/// Advisory only: this never fails. Empty input is 0 without touching the
/// encoder, a missing encoder falls back to [`estimate_tokens_for_text`], and
/// a panic inside the encoder is reported as 0.
pub fn count(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let Some(bpe) = encoder() else {
        return estimate_tokens_for_text(text);
    };
    match panic::catch_unwind(AssertUnwindSafe(|| bpe.encode_with_special_tokens(text).len())) {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(bytes = text.len(), "token encoder panicked; reporting 0");
            0
        }
    }
}

pub fn estimate_tokens_for_text(text: &str) -> usize {
    // Simple heuristic: 1 token ~ 4 characters
    text.chars().count().div_ceil(4)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenLevel {
    Normal,
    High,
}

impl TokenLevel {
    pub fn classify(count: usize, threshold: usize) -> Self {
        if count > threshold { TokenLevel::High } else { TokenLevel::Normal }
    }
}

/// `Tokens: 12,345`
pub fn format_badge(count: usize) -> String {
    format!("Tokens: {}", group_thousands(count))
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
