// Harvest Configuration

use crate::Result;
use crate::error::HarvestError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timeout applied when the configured one is zero
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration shared read-only by every probe of a harvest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Time allowed to connect, complete the handshake and receive response
    /// headers. Zero defers to [`DEFAULT_CONNECTION_TIMEOUT`].
    #[serde(rename = "connection_timeout_seconds", with = "duration_seconds")]
    pub connection_timeout: Duration,

    /// User-Agent sent with the probe request
    pub user_agent: Option<String>,
}

impl HarvestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Timeout actually handed to the transport
    pub fn effective_timeout(&self) -> Duration {
        if self.connection_timeout.is_zero() {
            DEFAULT_CONNECTION_TIMEOUT
        } else {
            self.connection_timeout
        }
    }

    /// User-Agent actually sent with the probe request
    pub fn effective_user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(concat!("certharvest/", env!("CARGO_PKG_VERSION")))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| HarvestError::ConfigFile {
                path: path.display().to_string(),
                source,
            })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the default configuration as an example TOML file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let example = Self::default()
            .with_timeout(DEFAULT_CONNECTION_TIMEOUT)
            .with_user_agent(concat!("certharvest/", env!("CARGO_PKG_VERSION")));
        let toml = toml::to_string_pretty(&example)?;

        std::fs::write(path, toml).map_err(|source| HarvestError::ConfigFile {
            path: path.display().to_string(),
            source,
        })
    }
}

/// (De)serializes a Duration as fractional seconds
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
