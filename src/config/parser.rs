use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Base domain generated demo addresses live under
pub const DEFAULT_BASE_DOMAIN: &str = "rbz.host";

/// How virtual ticks map to wall-clock time and how long transitions take.
///
/// # Examples
///
/// ```
/// use rbz_host::config::TimingConfig;
/// use std::time::Duration;
///
/// let timing = TimingConfig::default();
/// assert_eq!(timing.start_ticks, 3);
/// assert_eq!(timing.stop_ticks, 2);
/// assert_eq!(timing.tick(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingConfig {
    /// Length of one tick when a driver runs the registry in real time.
    pub tick_millis: u64,

    /// Ticks between `starting` and `online`.
    pub start_ticks: u64,

    /// Ticks between `stopping` and `offline` (or `starting` on restart).
    pub stop_ticks: u64,
}

impl TimingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            start_ticks: 3,
            stop_ticks: 2,
        }
    }
}

/// Main configuration for a server registry.
///
/// Every field has a default, so an empty document is a valid
/// configuration.
///
/// # JSON Schema
///
/// ```json
/// {
///   "baseDomain": "rbz.host",
///   "timing": {
///     "tickMillis": 1000,
///     "startTicks": 3,
///     "stopTicks": 2
///   },
///   "eventHistory": 1000,
///   "portSeed": 42
/// }
/// ```
///
/// The same keys are accepted in YAML when the file ends in `.yaml` or `.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Domain appended to the subdomain derived from a server's name.
    pub base_domain: String,

    /// Transition delays and tick length.
    pub timing: TimingConfig,

    /// Number of lifecycle events kept in memory.
    pub event_history: usize,

    /// Seed for port generation. Unset means seeded from the OS.
    pub port_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            timing: TimingConfig::default(),
            event_history: 1000,
            port_seed: None,
        }
    }
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, anything else
    /// as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The contents are not valid JSON/YAML for this schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::parse_from_yaml_str(&content)
        } else {
            Self::parse_from_str(&content)
        }
    }

    /// Parses a configuration from a JSON string.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Parses a configuration from a YAML string.
    pub fn parse_from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse YAML config: {}", e)))
    }
}
