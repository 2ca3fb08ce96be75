//! Git access: the subprocess collaborator and staged diff collection.

pub mod diff;
pub mod vcs;

pub use diff::{DiffSnapshot, MAX_DIFF_BYTES, TRUNCATION_MARKER, bound_diff, collect};
pub use vcs::{GitCli, Vcs, check_git_installed};
