//! Locale- and style-aware instruction prompts.

pub mod builder;
pub mod catalog;
pub mod locale;

pub use builder::{PromptSpec, RenderedPrompt, Style, build};
pub use catalog::{CommitType, TypeCatalog, default_catalog};
pub use locale::Locale;
