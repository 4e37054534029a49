//! Configuration types and loading
//!
//! Everything is optional: without `dip-claimer.toml` in the working
//! directory the built-in defaults apply, and any section or key left out
//! of the file keeps its default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "dip-claimer.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub files: FilesConfig,
    pub api: ApiConfig,
    pub schedule: ScheduleConfig,
    pub logging: LoggingConfig,
}

/// Input files
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// `email:password` per line
    pub accounts: PathBuf,
    /// One proxy URL per line, index-aligned with accounts
    pub proxies: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            accounts: PathBuf::from("account.txt"),
            proxies: PathBuf::from("ip.txt"),
        }
    }
}

/// Remote service
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: securitylabs_api::BASE_URL.to_string(),
        }
    }
}

/// Round pacing
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Pause between the end of one round and the start of the next
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| common::Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> common::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> common::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.schedule.interval_secs == 0 {
            return Err(common::Error::Config(
                "interval_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
