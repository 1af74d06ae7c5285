//! Configuration types for the navigation client

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{NaviClientError, NaviClientResult};

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API namespace stamped on every outbound call
    pub api_name: String,

    /// Timeout configurations
    pub timeouts: TimeoutConfig,

    /// Upper bound on calls awaiting a reply
    pub max_pending: usize,
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long a call waits for its reply
    #[serde(with = "duration_serde")]
    pub request: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_name: naviapi_protocol::API_NAME.to_string(),
            timeouts: TimeoutConfig::default(),
            max_pending: 64,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> NaviClientResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NaviClientResult<()> {
        if self.api_name.is_empty() {
            return Err(NaviClientError::config("api_name must not be empty"));
        }
        if self.max_pending == 0 {
            return Err(NaviClientError::config("max_pending must be at least 1"));
        }
        if self.timeouts.request.is_zero() {
            return Err(NaviClientError::config("request timeout must be non-zero"));
        }
        Ok(())
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request = timeout;
        self
    }
}

// Durations travel as milliseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
