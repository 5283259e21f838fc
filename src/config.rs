//! Configuration management for TitleScan.
//!
//! The endpoint base address is always supplied to the core, never
//! computed by it. Resolution order: CLI flag, `TITLESCAN_API_URL`
//! environment variable, `~/.config/titlescan/config.toml`, built-in
//! default.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::{AnalysisClient, ANALYZE_TIMEOUT_MS};

/// Default analysis service base address.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the base address.
pub const API_URL_ENV: &str = "TITLESCAN_API_URL";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    ANALYZE_TIMEOUT_MS
}

/// Resolved client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base address of the analysis service, including the API prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Total exchange budget in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Settings {
    /// Resolve settings from flag, environment, config file, and defaults.
    pub fn load(cli_url: Option<&str>) -> Self {
        let mut settings = Self::from_config_file().unwrap_or_default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                settings.api_base_url = url;
            }
        }
        if let Some(url) = cli_url {
            settings.api_base_url = url.to_string();
        }

        settings.api_base_url = settings.api_base_url.trim_end_matches('/').to_string();
        if url::Url::parse(&settings.api_base_url).is_err() {
            warn!(
                url = %settings.api_base_url,
                "API base address does not parse as a URL; requests will likely fail"
            );
        }

        settings
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Build the analysis client for these settings.
    pub fn client(&self) -> AnalysisClient {
        AnalysisClient::with_timeout(&self.api_base_url, Duration::from_millis(self.timeout_ms))
    }

    fn from_config_file() -> Option<Self> {
        let path = Self::config_file_path()?;
        let text = fs::read_to_string(&path).ok()?;
        match Self::from_toml_str(&text) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
                None
            }
        }
    }

    fn config_file_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("titlescan").join("config.toml"))
    }
}
