//! Applying a confirmed message to the repository.

use std::fmt;

use tracing::{debug, info};

use crate::confirm::ConfirmationOutcome;
use crate::error::ActionError;
use crate::git::Vcs;

/// What the generated text is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Commit,
    Branch,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Commit => "commit",
            ActionKind::Branch => "branch",
        }
    }

    /// Human name of the generated text.
    pub fn noun(&self) -> &'static str {
        match self {
            ActionKind::Commit => "commit message",
            ActionKind::Branch => "branch name",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The mutation ran; holds git's stdout.
    Done(String),
    /// Outcome was not `Accepted`; nothing was touched.
    Skipped,
}

impl Applied {
    /// git's stdout for a mutation that ran, if it printed anything.
    pub fn output(&self) -> Option<&str> {
        match self {
            Applied::Done(stdout) if !stdout.trim().is_empty() => Some(stdout.as_str()),
            _ => None,
        }
    }
}

/// Run the mutation for `kind` if and only if the operator accepted.
pub fn apply<V: Vcs + ?Sized>(
    vcs: &V,
    outcome: ConfirmationOutcome,
    message: &str,
    kind: ActionKind,
) -> Result<Applied, ActionError> {
    if outcome != ConfirmationOutcome::Accepted {
        debug!("Outcome {:?}: skipping {}", outcome, kind);
        return Ok(Applied::Skipped);
    }

    let result = match kind {
        ActionKind::Commit => vcs.commit(message),
        ActionKind::Branch => vcs.create_branch(message),
    };

    let stdout = result.map_err(|source| ActionError::VcsFailure {
        kind: kind.as_str(),
        message: message.to_string(),
        source,
    })?;

    info!("Applied {}: {}", kind, message);
    Ok(Applied::Done(stdout))
}
