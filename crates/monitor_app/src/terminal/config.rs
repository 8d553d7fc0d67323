use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use monitor_core::PollConfig;
use monitor_engine::ApiSettings;
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "monitor.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Settings read from `monitor.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub base_url: String,
    pub poll_period_ms: u64,
    pub display_window: u32,
    pub batch_refresh_secs: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let poll = PollConfig::default();
        Self {
            base_url: api.base_url,
            poll_period_ms: poll.period.as_millis() as u64,
            display_window: poll.display_window,
            batch_refresh_secs: 10,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            log_level: "info".to_string(),
            log_destination: LogDestination::Terminal,
            log_file: PathBuf::from("monitor.log"),
        }
    }
}

impl MonitorConfig {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ApiSettings::default()
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            period: Duration::from_millis(self.poll_period_ms),
            display_window: self.display_window,
        }
    }

    pub fn batch_refresh(&self) -> Duration {
        Duration::from_secs(self.batch_refresh_secs)
    }

    /// Falls back to `Info` for unknown level names.
    pub fn level(&self) -> LevelFilter {
        monitor_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Loads the config file. A missing file is not an error and yields defaults.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(MonitorConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
