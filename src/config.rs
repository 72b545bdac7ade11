//! Configuration management for the Imgur fetcher
//!
//! This module provides TOML-backed configuration with zero-config
//! defaults. Every setting has a built-in default, so the config file is
//! optional; an explicitly named file that does not exist is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{files, http};
use crate::errors::ConfigError;

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub http: HttpConfig,
    /// Transfer settings
    pub download: DownloadConfig,
    /// Output filename settings
    pub naming: NamingConfig,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

/// Transfer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Bytes requested per chunk pull
    pub chunk_size: usize,
    /// Default output directory (None = current directory)
    pub output_dir: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: files::DEFAULT_CHUNK_SIZE,
            output_dir: None,
        }
    }
}

/// Output filename settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Filename pattern for single images
    pub image_pattern: String,
    /// Filename pattern for album items
    pub album_pattern: String,
    /// Zero-padding width of the `{index}` token
    pub index_width: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            image_pattern: files::DEFAULT_IMAGE_PATTERN.to_string(),
            album_pattern: files::DEFAULT_ALBUM_PATTERN.to_string(),
            index_width: files::DEFAULT_INDEX_WIDTH,
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file is given.
    ///
    /// An explicitly named file must exist and parse; a missing override
    /// is an error rather than a silent fallback.
    pub fn load(config_file_override: Option<&Path>) -> Result<Self, ConfigError> {
        match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                debug!("loading config from {}", path.display());
                Self::load_from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.download.chunk_size, files::DEFAULT_CHUNK_SIZE);
        assert_eq!(config.naming.image_pattern, "{tag}.{ext}");
        assert_eq!(config.naming.album_pattern, "{index}_{tag}.{ext}");
        assert_eq!(config.naming.index_width, 3);
        assert!(config.download.output_dir.is_none());
        assert!(config.http.user_agent.contains("Firefox"));
    }

    #[test]
    fn test_no_override_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.download.chunk_size, files::DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[download]\nchunk_size = 4096").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.download.chunk_size, 4096);
        assert_eq!(config.naming.index_width, 3);
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [[").unwrap();

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_round_trip_serialization() {
        let config = AppConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.http.user_agent, config.http.user_agent);
    }
}
