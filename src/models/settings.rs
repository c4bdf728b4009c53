//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    30
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the verification service API
    pub api_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Jump straight into analysis after a successful upload
    pub auto_analyze: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            timeout_secs: default_timeout_secs(),
            auto_analyze: true,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub auto_analyze: Option<bool>,
}

impl SettingsUpdate {
    /// Whether this update changes anything at all
    pub fn is_empty(&self) -> bool {
        self.api_base_url.is_none() && self.timeout_secs.is_none() && self.auto_analyze.is_none()
    }
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(api_base_url) = update.api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(timeout_secs) = update.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(auto_analyze) = update.auto_analyze {
            self.auto_analyze = auto_analyze;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let parsed = url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("Invalid API base URL '{}': {}", self.api_base_url, e))?;
        if !["http", "https"].contains(&parsed.scheme()) {
            return Err(format!(
                "Invalid API base URL scheme: {}. Must be http or https",
                parsed.scheme()
            ));
        }

        if self.timeout_secs == 0 {
            return Err("Request timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}
