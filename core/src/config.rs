//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Production endpoint of the WeCom server API.
pub const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for one request round trip. Unset means no client-side
    /// deadline beyond ureq's defaults.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Read `WECOM_BASE_URL` and `WECOM_TIMEOUT_SECS`, falling back to the
    /// defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("WECOM_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_base_url);
        let timeout_secs = lookup("WECOM_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok());
        Self {
            base_url,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
