//! Conventional commit taxonomy offered to the model.

use std::collections::BTreeMap;
use std::fmt;

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitType {
    Build,
    Chore,
    Ci,
    Docs,
    Feat,
    Fix,
    Perf,
    Refactor,
    Revert,
    Style,
    Test,
}

impl CommitType {
    pub const ALL: [CommitType; 11] = [
        CommitType::Build,
        CommitType::Chore,
        CommitType::Ci,
        CommitType::Docs,
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Perf,
        CommitType::Refactor,
        CommitType::Revert,
        CommitType::Style,
        CommitType::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Build => "build",
            CommitType::Chore => "chore",
            CommitType::Ci => "ci",
            CommitType::Docs => "docs",
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Perf => "perf",
            CommitType::Refactor => "refactor",
            CommitType::Revert => "revert",
            CommitType::Style => "style",
            CommitType::Test => "test",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommitType::Build => {
                "Changes that affect the build system or external dependencies (e.g., gulp, broccoli, npm)."
            }
            CommitType::Chore => "Other changes that don't modify src or test files.",
            CommitType::Ci => {
                "Changes to CI configuration files and scripts (e.g., Travis, Circle, BrowserStack, SauceLabs)."
            }
            CommitType::Docs => "Documentation only changes.",
            CommitType::Feat => "A new feature.",
            CommitType::Fix => "A bug fix.",
            CommitType::Perf => "A code change that improves performance.",
            CommitType::Refactor => "A code change that neither fixes a bug nor adds a feature.",
            CommitType::Revert => "Reverts a previous commit.",
            CommitType::Style => {
                "Changes that do not affect the meaning of the code (white-space, formatting, missing semi-colons, etc.)."
            }
            CommitType::Test => "Adding missing tests or correcting existing tests.",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type name → description, ordered lexicographically by name.
///
/// A `BTreeMap` keeps serialization byte-stable across runs.
pub type TypeCatalog = BTreeMap<String, String>;

/// The full conventional taxonomy.
pub fn default_catalog() -> TypeCatalog {
    CommitType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), t.description().to_string()))
        .collect()
}
