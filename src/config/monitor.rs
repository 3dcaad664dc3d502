use ::config::{Config, Environment, File};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "monitor.toml";
const ENV_PREFIX: &str = "MONITOR";

/// Settings of the monitor itself (not the bot's runtime settings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Base URL of the bot's UI server exposing `/stats` and `/settings`.
    pub backend_url: String,
    pub poll_interval_ms: u64,
    pub skip_overlapping_cycles: bool,
    pub dashboard_port: u16,
    /// Newest log lines shown by the terminal logs view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tail: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            poll_interval_ms: 1000,
            skip_overlapping_cycles: false,
            dashboard_port: 3000,
            log_tail: None,
        }
    }
}

impl MonitorConfig {
    /// Defaults, then `path` if it exists, then `MONITOR__*` variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// CLI flags win over file and environment.
    pub fn apply_overrides(&mut self, backend_url: Option<String>, poll_interval_ms: Option<u64>) {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        if let Some(ms) = poll_interval_ms {
            self.poll_interval_ms = ms;
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            errors.push(format!("backend_url must be an http(s) URL, got {:?}", self.backend_url));
        }
        if self.poll_interval_ms == 0 {
            errors.push("poll_interval_ms must be > 0".to_string());
        }
        if self.log_tail == Some(0) {
            errors.push("log_tail must be > 0 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
