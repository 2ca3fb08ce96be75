//! Error types for combo modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or editing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the user home directory")]
    HomeDirNotFound,

    #[error("Config path {} is outside the trusted directory {}", path.display(), trusted.display())]
    UntrustedPath { path: PathBuf, trusted: PathBuf },

    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration line {line_number}: {line}")]
    InvalidLine { line_number: usize, line: String },

    #[error("Missing or empty '{0}' in configuration. Set it with: combo config set {0} <value>")]
    MissingKey(String),

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Key {0} not found in configuration")]
    KeyNotFound(String),
}

/// Errors from the version-control collaborator.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git executable not found in PATH")]
    GitNotInstalled,

    #[error("Not a git repository. Run combo from within a git work tree: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Bare repositories are not supported")]
    BareRepository,

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} exited with {}: {stderr}", status.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    CommandFailed {
        operation: String,
        status: Option<i32>,
        stderr: String,
    },
}

/// Errors from collecting the staged change set.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("No staged changes found. Stage your changes with `git add` first")]
    NoStagedChanges,

    #[error("Failed to read staged changes: {0}")]
    Vcs(#[from] VcsError),
}

/// Errors from rendering the instruction prompt.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("Invalid prompt configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown commit style '{0}' (expected 'conventional' or 'free')")]
    UnknownStyle(String),

    #[error("Failed to serialize commit type catalog: {0}")]
    SerializationFailed(String),
}

/// Errors from the completion service.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Completion request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Completion service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Completion service returned an undecodable response: {0}")]
    InvalidResponse(String),

    #[error("Completion service returned no usable message")]
    EmptyResponse,

    #[error("Completion service returned a malformed message: {0}")]
    MalformedResponse(String),
}

/// Errors from applying the confirmed message.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Failed to apply {kind} '{message}': {source}")]
    VcsFailure {
        kind: &'static str,
        message: String,
        #[source]
        source: VcsError,
    },
}

/// Any failure of a single diff-to-action cycle.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Failed to read confirmation input: {0}")]
    Confirmation(#[source] std::io::Error),

    #[error(transparent)]
    Action(#[from] ActionError),
}
