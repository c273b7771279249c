// Watch configuration
//
// Defaults, optional TOML file, then command line overrides.

use crate::cli::Args;
use crate::ct_logs::{DEFAULT_CERTSTREAM_URL, DEFAULT_IDLE_TIMEOUT, DEFAULT_RECONNECT_DELAY};
use crate::error::{Result, WatchError};
use crate::keywords::KeywordPaths;
use crate::monitor::alerts::pushover::{PUSHOVER_API_URL, PUSHOVER_VALIDATE_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default record log path
pub const DEFAULT_LOG_FILE: &str = "certstream.log";

/// Main watch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Record log file
    pub log_file: PathBuf,
    pub keywords: KeywordPaths,
    pub stream: StreamConfig,
    pub alerts: AlertsConfig,
    pub output: OutputConfig,
}

/// Certificate stream configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub url: String,
    pub reconnect_delay_secs: u64,
    /// Seconds of silence before a connection is dropped, 0 disables the check
    pub idle_timeout_secs: u64,
}

/// Alerts configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    pub pushover: Option<PushoverConfig>,
}

/// Pushover configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushoverConfig {
    pub enabled: bool,
    /// Application API token
    pub token: String,
    /// Recipient user or group key
    pub user: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub priority: Option<i8>,
    #[serde(default = "default_pushover_api_url")]
    pub api_url: String,
    #[serde(default = "default_pushover_validate_url")]
    pub validate_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Console and reporting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool,
    /// Seconds between statistics summaries, 0 disables them
    pub stats_interval_secs: u64,
}

fn default_pushover_api_url() -> String {
    PUSHOVER_API_URL.to_string()
}

fn default_pushover_validate_url() -> String {
    PUSHOVER_VALIDATE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            keywords: KeywordPaths::default(),
            stream: StreamConfig::default(),
            alerts: AlertsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CERTSTREAM_URL.to_string(),
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY.as_secs(),
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT.as_secs(),
        }
    }
}

impl StreamConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for PushoverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            user: String::new(),
            device: None,
            priority: None,
            api_url: default_pushover_api_url(),
            validate_url: default_pushover_validate_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            stats_interval_secs: 0,
        }
    }
}

impl WatchConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| WatchError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Build the effective configuration for a command line
    ///
    /// Explicit flags override the config file, which overrides the defaults.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    /// Apply command line overrides
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref path) = args.output.log_file {
            self.log_file = path.clone();
        }
        if let Some(ref path) = args.keywords.monitor_file {
            self.keywords.monitor = path.clone();
        }
        if let Some(ref path) = args.keywords.highlight_file {
            self.keywords.highlight = path.clone();
        }
        if let Some(ref path) = args.keywords.alert_file {
            self.keywords.alert = path.clone();
        }
        if let Some(ref url) = args.stream.url {
            self.stream.url = url.clone();
        }
        if let Some(delay) = args.stream.reconnect_delay {
            self.stream.reconnect_delay_secs = delay;
        }
        if let Some(idle) = args.stream.idle_timeout {
            self.stream.idle_timeout_secs = idle;
        }
        if args.output.no_color {
            self.output.color = false;
        }
        if let Some(interval) = args.output.stats_interval {
            self.output.stats_interval_secs = interval;
        }

        if let (Some(token), Some(user)) = (&args.notify.pushover_token, &args.notify.pushover_user)
        {
            let pushover = self.alerts.pushover.get_or_insert_with(PushoverConfig::default);
            pushover.enabled = true;
            pushover.token = token.clone();
            pushover.user = user.clone();
        }
    }
}
