//! Settings loaded from `everysize.toml`.
//!
//! Every field has a default, so a missing file, a missing section, or a
//! missing key all fall back to the built-in values.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::GridLayout;
use crate::model::codec::FIELD_DELIMITER;
use crate::store::DEFAULT_LIST_DELIMITER;
use crate::sync::DEFAULT_URL;

pub const CONFIG_FILE: &str = "everysize.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("list delimiter {0:?} is empty or can occur inside a box record")]
    Delimiter(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EverysizeConfig {
    /// Grid constants
    pub layout: GridLayout,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Previewed when neither the link nor storage has a URL.
    pub default_url: String,
    /// Separates box records in storage.
    pub list_delimiter: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_URL.to_string(),
            list_delimiter: DEFAULT_LIST_DELIMITER.to_string(),
        }
    }
}

impl EverysizeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Like [`load`](Self::load), but a bad file is logged and replaced by
    /// the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(%error, ?path, "ignoring invalid config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let delimiter = &self.session.list_delimiter;
        let collides = |c: char| {
            c == FIELD_DELIMITER || c.is_ascii_alphanumeric() || "-_.+".contains(c)
        };
        if delimiter.is_empty() || delimiter.chars().any(collides) {
            return Err(ConfigError::Delimiter(delimiter.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = EverysizeConfig::from_toml_str("").unwrap();
        assert_eq!(config, EverysizeConfig::default());
        assert_eq!(config.session.default_url, DEFAULT_URL);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EverysizeConfig::from_toml_str(
            r#"
            [layout]
            column_width = 40

            [session]
            default_url = "https://example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.column_width, 40);
        assert_eq!(config.layout.padding_size, 10);
        assert_eq!(config.session.default_url, "https://example.com");
        assert_eq!(config.session.list_delimiter, ",");
    }

    #[test]
    fn colliding_delimiter_is_rejected() {
        let result = EverysizeConfig::from_toml_str("[session]\nlist_delimiter = \"|\"");
        assert!(matches!(result, Err(ConfigError::Delimiter(_))));
        let result = EverysizeConfig::from_toml_str("[session]\nlist_delimiter = \"-\"");
        assert!(matches!(result, Err(ConfigError::Delimiter(_))));
        assert!(EverysizeConfig::from_toml_str("[session]\nlist_delimiter = \";\"").is_ok());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EverysizeConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, EverysizeConfig::default());
    }

    #[test]
    fn broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[layout\nrow_height = ").unwrap();
        assert!(EverysizeConfig::load(&path).is_err());
        assert_eq!(EverysizeConfig::load_or_default(&path), EverysizeConfig::default());
    }
}
