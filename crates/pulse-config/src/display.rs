//! Display formatting configuration.

use serde::{Deserialize, Serialize};

fn default_time_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// strftime pattern for creation timestamps.
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Render timestamps in UTC instead of the local timezone.
    #[serde(default)]
    pub utc: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            utc: false,
        }
    }
}
