//! Backend endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment key that sets [`BackendConfig::url`].
pub const URL_ENV_KEY: &str = "PULSE_BACKEND__URL";

const fn default_request_timeout_secs() -> u64 {
    10
}

fn default_list_function() -> String {
    "records:list".to_string()
}

fn default_update_function() -> String {
    "records:update".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Deployment URL (e.g., `http://127.0.0.1:3210`).
    #[serde(default)]
    pub url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path of the query returning every record.
    #[serde(default = "default_list_function")]
    pub list_function: String,

    /// Path of the mutation patching `name` and `value`.
    #[serde(default = "default_update_function")]
    pub update_function: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            list_function: default_list_function(),
            update_function: default_update_function(),
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Validated endpoint URL without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the URL is unset, or
    /// [`ConfigError::InvalidValue`] when it is not an `http(s)` URL with a host.
    pub fn endpoint(&self) -> Result<&str, ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "backend".into(),
                hint: URL_ENV_KEY.into(),
            });
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "backend.url".into(),
                reason: format!("expected an http:// or https:// URL, got '{url}'"),
            })?;

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "backend.url".into(),
                reason: format!("missing or malformed host in '{url}'"),
            });
        }

        Ok(url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> BackendConfig {
        BackendConfig {
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn default_is_not_configured() {
        let config = BackendConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.list_function, "records:list");
        assert_eq!(config.update_function, "records:update");
        assert!(matches!(
            config.endpoint(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn whitespace_url_is_not_configured() {
        assert!(!with_url("   ").is_configured());
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = with_url("http://127.0.0.1:3210/");
        assert_eq!(config.endpoint().unwrap(), "http://127.0.0.1:3210");
    }

    #[test]
    fn endpoint_accepts_https() {
        let config = with_url("https://happy-otter-123.example.cloud");
        assert_eq!(
            config.endpoint().unwrap(),
            "https://happy-otter-123.example.cloud"
        );
    }

    #[test]
    fn endpoint_rejects_other_schemes() {
        let err = with_url("ws://127.0.0.1:3210").endpoint().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn endpoint_rejects_missing_host() {
        let err = with_url("http:///path").endpoint().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
