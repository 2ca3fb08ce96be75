//! Instruction prompt construction.
//!
//! Rendering is a pure function of [`PromptSpec`] and [`DiffSnapshot`]: the
//! type catalog is a sorted map, so identical inputs always produce
//! byte-identical prompts.

use std::fmt;

use tracing::debug;

use crate::action::ActionKind;
use crate::error::PromptError;
use crate::git::DiffSnapshot;

use super::catalog::{TypeCatalog, default_catalog};
use super::locale::Locale;

/// Message format requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// A plain message with no prescribed structure.
    FreeForm,
    /// `type(scope): message`, with the type drawn from the catalog.
    #[default]
    Conventional,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::FreeForm => "free",
            Style::Conventional => "conventional",
        }
    }

    /// Placeholder the model's answer must follow.
    pub fn output_template(&self, kind: ActionKind) -> &'static str {
        match (kind, self) {
            (ActionKind::Commit, Style::FreeForm) => "<commit message>",
            (ActionKind::Commit, Style::Conventional) => "type(<optional scope>): <commit message>",
            (ActionKind::Branch, Style::FreeForm) => "<branch name>",
            (ActionKind::Branch, Style::Conventional) => "<type>/<branch name>",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Style {
    type Err = PromptError;

    /// An empty value selects the free-form style.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "free" | "free-form" => Ok(Style::FreeForm),
            "conventional" => Ok(Style::Conventional),
            _ => Err(PromptError::UnknownStyle(s.to_string())),
        }
    }
}

/// Everything that shapes the instruction text, fixed for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub kind: ActionKind,
    pub locale: Locale,
    /// Character budget for the generated text. Signed so that invalid
    /// budgets can be represented and rejected by [`build`].
    pub max_length: i64,
    pub style: Style,
    /// Populated only for [`Style::Conventional`].
    pub type_catalog: TypeCatalog,
}

impl PromptSpec {
    /// Spec with the standard catalog attached when the style calls for it.
    pub fn new(kind: ActionKind, locale: Locale, max_length: i64, style: Style) -> Self {
        let type_catalog = match style {
            Style::Conventional => default_catalog(),
            Style::FreeForm => TypeCatalog::new(),
        };
        Self {
            kind,
            locale,
            max_length,
            style,
            type_catalog,
        }
    }
}

/// System instruction plus the diff as user content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Render the instruction prompt for `spec` and `diff`.
pub fn build(spec: &PromptSpec, diff: &DiffSnapshot) -> Result<RenderedPrompt, PromptError> {
    if spec.locale.as_str().is_empty() {
        return Err(PromptError::InvalidConfig("locale cannot be empty".into()));
    }
    if spec.max_length <= 0 {
        return Err(PromptError::InvalidConfig(format!(
            "maxLength must be greater than 0 (got {})",
            spec.max_length
        )));
    }

    let template = spec.style.output_template(spec.kind);
    if template.is_empty() {
        return Err(PromptError::InvalidConfig("output format cannot be empty".into()));
    }
    let format_block = format!("The output response must be in format:\n{template}");

    let catalog_block = match spec.style {
        Style::Conventional => render_catalog(&spec.type_catalog)?,
        Style::FreeForm => String::new(),
    };

    let (subject, extra_rule) = match spec.kind {
        ActionKind::Commit => ("git commit message", ""),
        ActionKind::Branch => (
            "git branch name",
            " Use lowercase words separated by hyphens and no spaces.",
        ),
    };
    let noun = spec.kind.noun();

    let system = format!(
        "Write a concise and relevant {subject} for the given code diff:
Language: {locale}
Maximum length: {max_length} characters.
Focus: Only include details about the code changes. Avoid unnecessary information such as translations or extra explanations.{extra_rule}
Format: Use the specified {noun} format:
{catalog_block}
{format_block}
",
        locale = spec.locale,
        max_length = spec.max_length,
    );

    debug!(
        "Rendered {} prompt: {} chars, style={}, diff truncated={}",
        noun,
        system.len(),
        spec.style,
        diff.truncated
    );

    Ok(RenderedPrompt {
        system,
        user: diff.text.clone(),
    })
}

/// Catalog as an indented JSON object keyed by type name.
fn render_catalog(catalog: &TypeCatalog) -> Result<String, PromptError> {
    if catalog.is_empty() {
        return Err(PromptError::InvalidConfig(
            "conventional style requires a non-empty type catalog".into(),
        ));
    }

    let json = serde_json::to_string_pretty(catalog)
        .map_err(|e| PromptError::SerializationFailed(e.to_string()))?;

    Ok(format!(
        "Choose a type from the type-to-description JSON below that best describes the git diff:\n{json}"
    ))
}
