//! Runtime settings.
//!
//! The process takes no arguments. Every field has a default matching the
//! bridge firmware; a JSON file named by `PYRO_READER_CONFIG` may override any
//! subset of them.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::drivers::buffer::DEFAULT_CAPACITY;
use crate::types::SourceMode;
pub const CONFIG_ENV: &str = "PYRO_READER_CONFIG";
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("window_capacity must be greater than zero")]
    ZeroCapacity,
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}
impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
impl Default for SerialConfig {
    fn default() -> Self {
        let port_name = if cfg!(windows) { "COM3" } else { "/dev/ttyUSB0" };
        Self {
            port_name: port_name.to_owned(),
            baud_rate: 115_200,
            read_timeout_ms: 1_000,
        }
    }
}
/// Chart hints. Values outside the y range are still drawn, never clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_interval_ms: u64,
    pub y_range: f64,
    pub title: String,
}
impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 250,
            y_range: 400.0,
            title: "PYD1588 data".to_owned(),
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceMode,
    pub serial: SerialConfig,
    pub window_capacity: usize,
    pub display: DisplayConfig,
    pub simulation_interval_ms: u64,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceMode::Serial,
            serial: SerialConfig::default(),
            window_capacity: DEFAULT_CAPACITY,
            display: DisplayConfig::default(),
            simulation_interval_ms: 5,
        }
    }
}
impl AppConfig {
    /// Defaults, overridden by the file named in `PYRO_READER_CONFIG` if set.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }
}
