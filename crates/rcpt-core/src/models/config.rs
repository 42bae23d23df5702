//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ScanError};

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Vision service configuration.
    pub extraction: ExtractionConfig,
}

/// Vision service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Model identifier.
    pub model: String,

    /// API root URL.
    pub api_base: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ScanError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Connection settings for the Gemini client.
    #[cfg(feature = "native")]
    pub fn gemini(&self) -> rcpt_vision::GeminiConfig {
        rcpt_vision::GeminiConfig {
            api_base: self.extraction.api_base.clone(),
            model: self.extraction.model.clone(),
            api_key_env: self.extraction.api_key_env.clone(),
            timeout: std::time::Duration::from_secs(self.extraction.timeout_secs),
        }
    }
}
