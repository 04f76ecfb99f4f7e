//! Configuration
//!
//! Layered configuration for one extraction run: a JSON file (default
//! `config.json`, overridable on the command line) under a `MAILSNAP_`-prefixed
//! environment source. The core never inspects connection parameters; they are
//! handed opaquely to the store implementation.

use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for one snapshot run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote store connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the mailbox REST API.
    pub base_url: String,
    /// Address of the mailbox to snapshot.
    pub mailbox: String,
    /// Bearer token; falls back to the MAILSNAP_TOKEN environment variable.
    #[serde(default)]
    pub token: Option<String>,
}

impl ConnectionConfig {
    /// Token from config, or from `MAILSNAP_TOKEN`.
    pub fn resolved_token(&self) -> Result<String, SnapshotError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        std::env::var("MAILSNAP_TOKEN").map_err(|_| {
            SnapshotError::Config(
                "no API token: set connection.token or the MAILSNAP_TOKEN environment variable"
                    .to_string(),
            )
        })
    }
}

/// Extraction tuning: page sizes and distinguished folder handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Folders fetched per page.
    #[serde(default = "default_folder_page_size")]
    pub folder_page_size: usize,

    /// Messages fetched per page.
    #[serde(default = "default_message_page_size")]
    pub message_page_size: usize,

    /// Display name of the search folder spanning the whole account.
    #[serde(default = "default_all_items_folder")]
    pub all_items_folder: String,

    /// Whether to exclude the well-known junk folder from the message stream.
    #[serde(default = "default_true")]
    pub exclude_junk: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            folder_page_size: default_folder_page_size(),
            message_page_size: default_message_page_size(),
            all_items_folder: default_all_items_folder(),
            exclude_junk: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: true,
            level: default_log_level(),
            format: default_format(),
        }
    }
}

fn default_folder_page_size() -> usize {
    100
}

fn default_message_page_size() -> usize {
    1000
}

fn default_all_items_folder() -> String {
    "AllItems".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl SnapshotConfig {
    /// Load configuration from a file and the environment.
    ///
    /// With no explicit path, `config.json` in the working directory is used
    /// when present. Environment variables use the `MAILSNAP_` prefix with
    /// `__` as the nesting separator (e.g. `MAILSNAP_CONNECTION__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self, SnapshotError> {
        let builder = match path {
            Some(p) => config::Config::builder().add_source(config::File::from(p)),
            None => config::Config::builder()
                .add_source(config::File::from(Path::new("config.json")).required(false)),
        };
        let settings = builder
            .add_source(config::Environment::with_prefix("MAILSNAP").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_with_defaults_applied() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "connection": {{
                    "base_url": "https://mail.example.com/api/v1",
                    "mailbox": "user@example.com",
                    "token": "secret"
                }},
                "extraction": {{ "folder_page_size": 25 }}
            }}"#
        )
        .unwrap();

        let config = SnapshotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.connection.base_url, "https://mail.example.com/api/v1");
        assert_eq!(config.connection.mailbox, "user@example.com");
        assert_eq!(config.extraction.folder_page_size, 25);
        assert_eq!(config.extraction.message_page_size, 1000);
        assert_eq!(config.extraction.all_items_folder, "AllItems");
        assert!(config.extraction.exclude_junk);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let err = SnapshotConfig::load(Some(Path::new("/nonexistent/mailsnap.json"))).unwrap_err();
        assert!(matches!(err, SnapshotError::Config(_)));
    }

    #[test]
    fn test_token_resolution_prefers_config_value() {
        let connection = ConnectionConfig {
            base_url: "https://mail.example.com".to_string(),
            mailbox: "user@example.com".to_string(),
            token: Some("from-config".to_string()),
        };
        assert_eq!(connection.resolved_token().unwrap(), "from-config");
    }

    #[test]
    fn test_extraction_defaults() {
        let extraction = ExtractionConfig::default();
        assert_eq!(extraction.folder_page_size, 100);
        assert_eq!(extraction.message_page_size, 1000);
        assert_eq!(extraction.all_items_folder, "AllItems");
        assert!(extraction.exclude_junk);
    }
}
