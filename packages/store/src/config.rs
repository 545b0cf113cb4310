//! # Client configuration — `easykeeper.toml`
//!
//! The server reads this file from its working directory and hands it to the
//! client through the `get_client_config` server function. A missing file, or a
//! file that omits a section, is equivalent to the defaults. A `timestamp_format`
//! that chrono cannot render, or whose output cannot be parsed back into a date
//! and time, is replaced by [`DEFAULT_TIMESTAMP_FORMAT`] with a warning.
//!
//! ## Structure
//!
//! ```toml
//! [display]
//! timestamp_format = "%-m/%-d/%Y, %-I:%M:%S %p"   # chrono format string
//!
//! [session]
//! check_interval_secs = 30   # 0 disables session polling
//! ```

use serde::{Deserialize, Serialize};

use crate::models::timestamp_format_is_usable;

/// Default display format, e.g. `1/5/2026, 3:04:05 PM`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Top-level configuration stored in `easykeeper.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeeperConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// How timestamps are written into notes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl DisplayConfig {
    /// The configured format, or the default one if it is not usable.
    pub fn checked_format(&self) -> &str {
        if timestamp_format_is_usable(&self.timestamp_format) {
            &self.timestamp_format
        } else {
            DEFAULT_TIMESTAMP_FORMAT
        }
    }
}

/// Session expiry detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds between session checks. 0 disables polling.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u32,
}

fn default_check_interval() -> u32 {
    30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
        }
    }
}

impl KeeperConfig {
    /// Builder method to set the session check interval.
    pub fn with_check_interval(mut self, secs: u32) -> Self {
        self.session.check_interval_secs = secs;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "easykeeper.toml"
    }

    /// Parse from TOML string, replacing an unusable timestamp format.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(s)?;
        if config.display.checked_format() != config.display.timestamp_format {
            tracing::warn!(
                format = %config.display.timestamp_format,
                "unusable timestamp_format, using default"
            );
            config.display.timestamp_format = default_timestamp_format();
        }
        Ok(config)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
