//! Client configuration file.

use std::path::{Path, PathBuf};

use flipdeck_core::{PasswordGate, SpeechConfig};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Settings stored in `<config dir>/flipdeck/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Base URL of the card store service.
    pub server_url: String,
    /// Hex SHA-256 of the editor password. No digest leaves the editor open.
    pub editor_password_sha256: Option<String>,
    pub speech: SpeechConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            editor_password_sha256: None,
            speech: SpeechConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flipdeck").join("config.json"))
    }

    /// Load from an explicit path, or from the default location when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Command-line or environment override of the server URL.
    pub fn with_server(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        self
    }

    pub fn gate(&self) -> PasswordGate {
        match &self.editor_password_sha256 {
            Some(digest) => PasswordGate::from_digest(digest.as_str()),
            None => PasswordGate::open(),
        }
    }
}
