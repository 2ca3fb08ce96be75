//! Line-oriented `key=value` configuration file confined to a trusted directory.
//!
//! The store never touches a path that is not a descendant of its trusted
//! base directory. The check is done lexically on construction and again on
//! the canonical path whenever the file exists, so a symlink pointing out of
//! the directory is rejected as well.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ConfigError;

/// Directory under the user's home that holds the config file.
pub const CONFIG_DIR_NAME: &str = ".combo";

/// Name of the config file inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config";

/// Content written when the config file does not exist yet.
pub const DEFAULT_CONFIG: &str = "# Default configuration
openai_api_key=
prompt_locale=en-US
prompt_max_length=72
";

const SAVED_HEADER: &str = "# combo configuration\n";

/// Parsed key/value pairs in a stable (sorted) order.
pub type ConfigMap = BTreeMap<String, String>;

/// Handle to the config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    trusted_dir: PathBuf,
    path: PathBuf,
}

impl ConfigStore {
    /// Store at `~/.combo/config`.
    pub fn default_location() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        let trusted_dir = home.join(CONFIG_DIR_NAME);
        let path = trusted_dir.join(CONFIG_FILE_NAME);
        Self::new(trusted_dir, path)
    }

    /// Store for `path`, which must live under `trusted_dir`.
    pub fn new(trusted_dir: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let trusted_dir = trusted_dir.into();
        let path = path.into();
        check_lexically_within(&trusted_dir, &path)?;
        Ok(Self { trusted_dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn trusted_dir(&self) -> &Path {
        &self.trusted_dir
    }

    /// Create the trusted directory and a default config file if missing.
    pub fn ensure(&self) -> Result<(), ConfigError> {
        if !self.trusted_dir.exists() {
            create_private_dir(&self.trusted_dir).map_err(|source| ConfigError::WriteFailed {
                path: self.trusted_dir.clone(),
                source,
            })?;
            debug!("Created config directory {}", self.trusted_dir.display());
        }

        if !self.entry_exists()? {
            let write_err = |source| ConfigError::WriteFailed {
                path: self.path.clone(),
                source,
            };
            // create_new refuses to follow a symlink planted at the path.
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.path)
                .map_err(write_err)?;
            file.write_all(DEFAULT_CONFIG.as_bytes()).map_err(write_err)?;
            debug!("Wrote default config to {}", self.path.display());
        }

        self.check_resolved()
    }

    /// Read and parse the config file. A missing file yields an empty map.
    pub fn load(&self) -> Result<ConfigMap, ConfigError> {
        if !self.entry_exists()? {
            return Ok(ConfigMap::new());
        }
        self.check_resolved()?;

        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        parse_config(&content)
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        self.load()?
            .remove(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Set a key and rewrite the file atomically.
    pub fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        if key.is_empty() || key.contains('=') || key.starts_with('#') {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "keys must be non-empty and cannot contain '=' or start with '#'".into(),
            });
        }
        if value.contains('\n') {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "values must fit on a single line".into(),
            });
        }

        self.ensure()?;
        let mut config = self.load()?;
        config.insert(key.to_string(), value.trim().to_string());
        self.save(&config)
    }

    fn save(&self, config: &ConfigMap) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        // Temp file lives next to the target so persist() is a same-filesystem rename.
        let mut tmp = NamedTempFile::new_in(&self.trusted_dir).map_err(write_err)?;
        tmp.write_all(render_config(config).as_bytes())
            .map_err(write_err)?;
        tmp.persist(&self.path)
            .map_err(|e| write_err(e.error))?;

        debug!("Saved {} config keys to {}", config.len(), self.path.display());
        Ok(())
    }

    /// Whether anything, including a dangling symlink, sits at the config path.
    fn entry_exists(&self) -> Result<bool, ConfigError> {
        match fs::symlink_metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ConfigError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Re-check containment on the canonical paths (catches symlink escapes).
    fn check_resolved(&self) -> Result<(), ConfigError> {
        let untrusted = || ConfigError::UntrustedPath {
            path: self.path.clone(),
            trusted: self.trusted_dir.clone(),
        };

        let trusted = fs::canonicalize(&self.trusted_dir).map_err(|_| untrusted())?;
        let resolved = fs::canonicalize(&self.path).map_err(|_| untrusted())?;
        if resolved.starts_with(&trusted) && resolved != trusted {
            Ok(())
        } else {
            Err(untrusted())
        }
    }
}

/// Parse `key=value` lines. Blank lines and `#` comments are skipped.
pub fn parse_config(content: &str) -> Result<ConfigMap, ConfigError> {
    let mut config = ConfigMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::InvalidLine {
                line_number: idx + 1,
                line: line.to_string(),
            });
        };

        config.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(config)
}

/// Render a map back to the on-disk format.
pub fn render_config(config: &ConfigMap) -> String {
    let mut out = String::from(SAVED_HEADER);
    for (key, value) in config {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

fn check_lexically_within(trusted_dir: &Path, path: &Path) -> Result<(), ConfigError> {
    let has_parent_ref = path
        .components()
        .chain(trusted_dir.components())
        .any(|c| matches!(c, Component::ParentDir));

    if has_parent_ref || !path.starts_with(trusted_dir) || path == trusted_dir {
        return Err(ConfigError::UntrustedPath {
            path: path.to_path_buf(),
            trusted: trusted_dir.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o750).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let trusted = dir.path().join(CONFIG_DIR_NAME);
        let store = ConfigStore::new(&trusted, trusted.join(CONFIG_FILE_NAME)).unwrap();
        (dir, store)
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# comment\n\n  openai_api_key = sk-test  \nprompt_locale=fr-FR\n";
        let config = parse_config(content).unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config["openai_api_key"], "sk-test");
        assert_eq!(config["prompt_locale"], "fr-FR");
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let config = parse_config("openai_base_url=http://host/v1?a=b\n").unwrap();
        assert_eq!(config["openai_base_url"], "http://host/v1?a=b");
    }

    #[test]
    fn test_parse_rejects_line_without_equals() {
        let err = parse_config("openai_api_key=x\nbroken line\n").unwrap_err();
        match err {
            ConfigError::InvalidLine { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "broken line");
            }
            other => panic!("Expected InvalidLine, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config["openai_api_key"], "");
        assert_eq!(config["prompt_locale"], "en-US");
        assert_eq!(config["prompt_max_length"], "72");
    }

    #[test]
    fn test_render_is_sorted_and_reparses() {
        let mut config = ConfigMap::new();
        config.insert("prompt_max_length".into(), "50".into());
        config.insert("openai_api_key".into(), "sk".into());
        let rendered = render_config(&config);
        assert_eq!(
            rendered,
            "# combo configuration\nopenai_api_key=sk\nprompt_max_length=50\n"
        );
        assert_eq!(parse_config(&rendered).unwrap(), config);
    }

    #[test]
    fn test_new_rejects_path_outside_trusted_dir() {
        let err = ConfigStore::new("/home/u/.combo", "/etc/passwd").unwrap_err();
        assert!(matches!(err, ConfigError::UntrustedPath { .. }));
    }

    #[test]
    fn test_new_rejects_parent_dir_traversal() {
        let err = ConfigStore::new("/home/u/.combo", "/home/u/.combo/../.ssh/id_rsa").unwrap_err();
        assert!(matches!(err, ConfigError::UntrustedPath { .. }));
    }

    #[test]
    fn test_new_rejects_string_prefix_sibling() {
        // "/home/u/.combo-evil" shares a string prefix but is not a descendant.
        let err = ConfigStore::new("/home/u/.combo", "/home/u/.combo-evil/config").unwrap_err();
        assert!(matches!(err, ConfigError::UntrustedPath { .. }));
    }

    #[test]
    fn test_ensure_creates_default_file() {
        let (_dir, store) = temp_store();
        store.ensure().unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, DEFAULT_CONFIG);
    }

    #[test]
    fn test_ensure_keeps_existing_file() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.trusted_dir()).unwrap();
        fs::write(store.path(), "openai_api_key=sk-keep\n").unwrap();
        store.ensure().unwrap();
        assert_eq!(store.get("openai_api_key").unwrap(), "sk-keep");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let (_dir, store) = temp_store();
        store.set("openai_api_key", "sk-123").unwrap();
        store.set("prompt_max_length", "60").unwrap();
        assert_eq!(store.get("openai_api_key").unwrap(), "sk-123");
        assert_eq!(store.get("prompt_max_length").unwrap(), "60");
        // Defaults written by ensure() survive the rewrite.
        assert_eq!(store.get("prompt_locale").unwrap(), "en-US");
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let (_dir, store) = temp_store();
        store.set("prompt_locale", "de-DE").unwrap();
        store.set("prompt_locale", "ja-JP").unwrap();
        assert_eq!(store.get("prompt_locale").unwrap(), "ja-JP");
    }

    #[test]
    fn test_set_rejects_bad_keys() {
        let (_dir, store) = temp_store();
        assert!(store.set("", "x").is_err());
        assert!(store.set("a=b", "x").is_err());
        assert!(store.set("#key", "x").is_err());
        assert!(store.set("key", "multi\nline").is_err());
    }

    #[test]
    fn test_get_unknown_key() {
        let (_dir, store) = temp_store();
        store.ensure().unwrap();
        let err = store.get("nope").unwrap_err();
        assert!(matches!(err, ConfigError::KeyNotFound(k) if k == "nope"));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_rejects_symlink_escaping_trusted_dir() {
        let (dir, store) = temp_store();
        fs::create_dir_all(store.trusted_dir()).unwrap();
        let outside = dir.path().join("outside");
        fs::write(&outside, "openai_api_key=stolen\n").unwrap();
        std::os::unix::fs::symlink(&outside, store.path()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, ConfigError::UntrustedPath { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_refuses_dangling_symlink() {
        let (dir, store) = temp_store();
        fs::create_dir_all(store.trusted_dir()).unwrap();
        let outside = dir.path().join("planted");
        std::os::unix::fs::symlink(&outside, store.path()).unwrap();

        let err = store.ensure().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WriteFailed { .. } | ConfigError::UntrustedPath { .. }
        ));
        assert!(!outside.exists());

        let err = store.load().unwrap_err();
        assert!(matches!(err, ConfigError::UntrustedPath { .. }));
        assert!(store.set("openai_api_key", "sk-test").is_err());
        assert!(!outside.exists());
    }
}
