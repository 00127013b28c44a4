//! Prompt wizard: renders step-by-step AI prompts from Markdown templates,
//! counts their tokens, and edits checkbox task lists inside AI replies.
//!
//! The text core (`tokens`, `template`, `tasks`) is pure and synchronous.
//! The remaining modules are the glue the `pw` binary is built from.

pub mod config;
pub mod io;
pub mod llm;
pub mod render;
pub mod store;
pub mod tasks;
pub mod template;
pub mod tokens;
pub mod wizard;
