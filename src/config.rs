//! Configuration file parser for ~/.config/vitrine/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use crate::paginator::PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A key parsed but its value is unusable.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog endpoint. `--endpoint` takes precedence.
    pub endpoint: Option<String>,

    /// Items revealed per page of infinite scroll.
    pub page_size: usize,

    /// Quiet period before search edits are written to the location.
    pub search_debounce_ms: u64,

    /// Timeout for the catalog request.
    pub request_timeout_secs: u64,

    /// Prefix for paid prices.
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            page_size: PAGE_SIZE,
            search_debounce_ms: 300,
            request_timeout_secs: 30,
            currency_symbol: "$".to_string(),
        }
    }
}

/// The parts of [`Config`] the session itself consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub page_size: usize,
    pub search_debounce: Duration,
    pub currency_symbol: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Config::default().session_settings()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "endpoint",
        "page_size",
        "search_debounce_ms",
        "request_timeout_secs",
        "currency_symbol",
    ];

    /// Default location: `$HOME/.config/vitrine/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("vitrine")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    /// - `page_size = 0` → `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to prevent memory exhaustion
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        if config.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be at least 1".to_string(),
            ));
        }
        tracing::info!(
            page_size = config.page_size,
            debounce_ms = config.search_debounce_ms,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            page_size: self.page_size,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.page_size, 12);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/vitrine_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("vitrine_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.page_size, 12);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::parse("page_size = 24\n").unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_full_config() {
        let content = r#"
endpoint = "https://shop.example.com/api/items"
page_size = 6
search_debounce_ms = 150
request_timeout_secs = 5
currency_symbol = "€"
"#;
        let config = Config::parse(content).unwrap();
        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://shop.example.com/api/items")
        );
        let settings = config.session_settings();
        assert_eq!(settings.page_size, 6);
        assert_eq!(settings.search_debounce, Duration::from_millis(150));
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::parse("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("page_size = 3\ntheme = \"dark\"\n").unwrap();
        assert_eq!(config.page_size, 3);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::parse("page_size = \"twelve\"\n").is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::parse("page_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("vitrine_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        // Write a file just over 1MB
        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
