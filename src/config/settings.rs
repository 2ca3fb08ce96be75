//! Typed view of the config file, resolved once per invocation.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::action::ActionKind;
use crate::error::{ConfigError, PromptError};
use crate::prompt::{Locale, PromptSpec, Style};

use super::store::{ConfigMap, ConfigStore};

pub const KEY_API_KEY: &str = "openai_api_key";
pub const KEY_LOCALE: &str = "prompt_locale";
pub const KEY_MAX_LENGTH: &str = "prompt_max_length";
pub const KEY_STYLE: &str = "prompt_style";
pub const KEY_MODEL: &str = "openai_model";
pub const KEY_BASE_URL: &str = "openai_base_url";

pub const DEFAULT_MAX_LENGTH: i64 = 72;
pub const DEFAULT_STYLE: &str = "conventional";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Character budget for generated branch names.
pub const BRANCH_MAX_LENGTH: i64 = 30;

/// Resolved configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub locale: Locale,
    pub max_length: i64,
    /// Raw style value; parsed when a prompt is built so an unknown style
    /// surfaces as a prompt error.
    pub style: String,
    pub model: String,
    pub base_url: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("locale", &self.locale)
            .field("max_length", &self.max_length)
            .field("style", &self.style)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Settings {
    /// Create the default file if needed, then load and validate it.
    pub fn load(store: &ConfigStore) -> Result<Self, ConfigError> {
        store.ensure()?;
        let settings = Self::from_map(&store.load()?)?;
        debug!("Loaded settings from {}: {:?}", store.path().display(), settings);
        Ok(settings)
    }

    pub fn from_map(config: &ConfigMap) -> Result<Self, ConfigError> {
        let api_key = non_empty(config, KEY_API_KEY)
            .ok_or_else(|| ConfigError::MissingKey(KEY_API_KEY.to_string()))?
            .to_string();

        let locale = match non_empty(config, KEY_LOCALE) {
            None => Locale::default(),
            Some(raw) => Locale::from_str(raw).map_err(|reason| ConfigError::InvalidValue {
                key: KEY_LOCALE.to_string(),
                value: raw.to_string(),
                reason,
            })?,
        };

        let max_length = match non_empty(config, KEY_MAX_LENGTH) {
            None => DEFAULT_MAX_LENGTH,
            Some(raw) => parse_max_length(raw)?,
        };

        let style = config
            .get(KEY_STYLE)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_STYLE.to_string());

        Ok(Self {
            api_key,
            locale,
            max_length,
            style,
            model: non_empty(config, KEY_MODEL).unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: non_empty(config, KEY_BASE_URL)
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Character budget for `kind`.
    pub fn budget(&self, kind: ActionKind) -> i64 {
        match kind {
            ActionKind::Commit => self.max_length,
            ActionKind::Branch => BRANCH_MAX_LENGTH,
        }
    }

    /// Prompt parameters for one invocation of `kind`.
    pub fn prompt_spec(&self, kind: ActionKind) -> Result<PromptSpec, PromptError> {
        let style = Style::from_str(&self.style)?;
        Ok(PromptSpec::new(kind, self.locale, self.budget(kind), style))
    }
}

fn non_empty<'a>(config: &'a ConfigMap, key: &str) -> Option<&'a str> {
    config.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_max_length(raw: &str) -> Result<i64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: KEY_MAX_LENGTH.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let value: i64 = raw.parse().map_err(|_| invalid("expected an integer"))?;
    if value <= 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(value)
}
