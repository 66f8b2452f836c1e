//! Runtime configuration.
//!
//! Defaults target the public Attio endpoints. Environment variables and an
//! optional JSON file can point the client elsewhere (staging, test servers).

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Attio REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.attio.com/v2";

/// Attio web app base URL, used for record deep links.
pub const DEFAULT_APP_BASE: &str = "https://app.attio.com";

pub const DEFAULT_USER_AGENT: &str = concat!("attio-capture-core/", env!("CARGO_PKG_VERSION"));

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttioConfig {
    pub api_base: String,
    pub app_base: String,
    /// Request timeout; `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for AttioConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            app_base: DEFAULT_APP_BASE.to_string(),
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AttioConfig {
    /// Defaults overridden by `ATTIO_API_BASE`, `ATTIO_APP_BASE` and
    /// `ATTIO_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_base) = env::var("ATTIO_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(app_base) = env::var("ATTIO_APP_BASE") {
            config.app_base = app_base;
        }
        if let Ok(timeout) = env::var("ATTIO_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.timeout_secs = Some(secs),
                Err(_) => log::warn!("CONFIG_IGNORED key=ATTIO_TIMEOUT_SECS value={:?}", timeout),
            }
        }

        config.normalized()
    }

    /// Load from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AttioConfig = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config.normalized())
    }

    /// Deep link to a person record in the web app.
    pub fn record_url(&self, workspace_slug: &str, record_id: &str) -> String {
        format!("{}/{}/person/{}", self.app_base, workspace_slug, record_id)
    }

    fn normalized(mut self) -> Self {
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self.app_base = self.app_base.trim_end_matches('/').to_string();
        self
    }
}
