//! Cleanup and sanity checks on the raw completion text.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::warn;

use crate::action::ActionKind;
use crate::error::CompletionError;

/// Characters and sequences git refuses in a ref name.
static INVALID_REF_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s~^:?*\[\\\x00-\x1f\x7f]|\.\.|@\{|//").expect("Invalid regex")
});

/// A cleaned, non-empty message ready for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMessage(String);

impl GeneratedMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn raw completion text into a [`GeneratedMessage`] for `kind`.
///
/// Exceeding `max_length` characters is logged but not an error; the budget
/// is advisory for the service.
pub fn validate(raw: &str, kind: ActionKind, max_length: i64) -> Result<GeneratedMessage, CompletionError> {
    let text = strip_wrapping(raw.trim()).trim();
    if text.is_empty() {
        return Err(CompletionError::EmptyResponse);
    }

    if kind == ActionKind::Branch {
        check_ref_name(text)?;
    }

    let length = text.chars().count();
    if max_length > 0 && length as i64 > max_length {
        warn!(
            "Generated {} is {} characters, over the {} character budget",
            kind.noun(),
            length,
            max_length
        );
    }

    Ok(GeneratedMessage(text.to_string()))
}

/// Remove one pair of matching backticks or quotes around the whole text.
fn strip_wrapping(text: &str) -> &str {
    for quote in ['`', '"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

fn check_ref_name(name: &str) -> Result<(), CompletionError> {
    let malformed = |why: &str| CompletionError::MalformedResponse(format!("'{name}' is not a valid branch name: {why}"));

    if let Some(m) = INVALID_REF_PARTS.find(name) {
        return Err(malformed(&format!("contains {:?}", m.as_str())));
    }
    if name.starts_with(['-', '/']) {
        return Err(malformed("starts with '-' or '/'"));
    }
    if name.ends_with(['/', '.']) {
        return Err(malformed("ends with '/' or '.'"));
    }
    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(malformed(&format!("component '{component}' starts with '.'")));
        }
        if component.ends_with(".lock") {
            return Err(malformed(&format!("component '{component}' ends with '.lock'")));
        }
    }
    if name == "@" {
        return Err(malformed("'@' alone is reserved"));
    }
    Ok(())
}
