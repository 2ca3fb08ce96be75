//! combo - A CLI tool that writes git commit messages and branch names from staged changes.
//!
//! # Overview
//!
//! combo reads the staged diff, asks an OpenAI-compatible completion service
//! for a commit message or branch name in the configured language and style,
//! shows the suggestion, and commits or creates the branch only after the
//! operator accepts it with a single keystroke.

pub mod action;
pub mod config;
pub mod confirm;
pub mod error;
pub mod git;
pub mod llm;
pub mod pipeline;
pub mod prompt;

// Re-export commonly used types
pub use action::{ActionKind, Applied};
pub use config::{ConfigStore, Settings};
pub use confirm::{ConfirmationOutcome, Prompter};
pub use error::{
    ActionError, CompletionError, ConfigError, DiffError, PipelineError, PromptError, VcsError,
};
pub use git::{DiffSnapshot, GitCli, Vcs};
pub use llm::{CompletionGateway, GeneratedMessage, OpenAiClient};
pub use pipeline::{RunOutcome, run};
pub use prompt::{Locale, PromptSpec, RenderedPrompt, Style};
