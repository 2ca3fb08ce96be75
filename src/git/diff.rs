//! Staged change collection with a hard size ceiling.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::DiffError;

use super::vcs::Vcs;

/// Maximum bytes of diff text sent to the completion service.
pub const MAX_DIFF_BYTES: usize = 4096;

/// Appended to the diff text when it was cut at [`MAX_DIFF_BYTES`].
pub const TRUNCATION_MARKER: &str = "\n[...truncated]";

/// The staged change set for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSnapshot {
    /// Staged paths. Only used for the emptiness check; never truncated.
    pub files: BTreeSet<String>,
    /// Diff body, at most [`MAX_DIFF_BYTES`] plus the marker.
    pub text: String,
    pub truncated: bool,
}

/// Read the staged state and bound its size.
///
/// Fails with [`DiffError::NoStagedChanges`] before the diff body is even
/// requested when nothing is staged.
pub fn collect<V: Vcs + ?Sized>(vcs: &V) -> Result<DiffSnapshot, DiffError> {
    let files: BTreeSet<String> = vcs.staged_files()?.into_iter().collect();
    if files.is_empty() {
        return Err(DiffError::NoStagedChanges);
    }

    let raw = vcs.staged_diff()?;
    let raw_len = raw.len();
    let (text, truncated) = bound_diff(raw);

    if truncated {
        warn!(
            "Staged diff is {} bytes; sending the first {} bytes",
            raw_len, MAX_DIFF_BYTES
        );
    }
    debug!(
        "Collected diff: {} files, {} bytes, truncated={}",
        files.len(),
        text.len(),
        truncated
    );

    Ok(DiffSnapshot {
        files,
        text,
        truncated,
    })
}

/// Cut `text` to [`MAX_DIFF_BYTES`] and append the marker if it was longer.
///
/// The cut lands on the nearest UTF-8 character boundary at or below the
/// ceiling, which is exactly the ceiling for ASCII input.
pub fn bound_diff(mut text: String) -> (String, bool) {
    if text.len() <= MAX_DIFF_BYTES {
        return (text, false);
    }

    let mut end = MAX_DIFF_BYTES;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push_str(TRUNCATION_MARKER);
    (text, true)
}
