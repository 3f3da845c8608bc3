// Error types for certharvest
//
// Every target-level failure ends up inside a HarvestResult as data; only
// configuration loading and runtime construction surface as Err to callers.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Target could not be turned into an https URL
    #[error("Invalid target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Connection, handshake or request failed at the transport layer
    #[error("Connection to {target} failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    /// Configured connection timeout elapsed
    #[error("Connection to {target} timed out after {duration:?}")]
    Timeout { target: String, duration: Duration },

    /// A presented certificate could not be parsed (index 0 is the leaf)
    #[error("Certificate {index} of presented chain could not be parsed: {details}")]
    CertificateParse { index: usize, details: String },

    /// Exchange completed but no certificate was observed
    #[error("No certificates presented by {target}")]
    NoCertificates { target: String },

    /// Per-probe TLS configuration could not be built
    #[error("TLS configuration error: {0}")]
    TlsConfig(#[from] rustls::Error),

    /// Per-probe HTTP client could not be built
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Probe task terminated without producing a result
    #[error("Probe for {target} aborted: {details}")]
    ProbeAborted { target: String, details: String },

    /// Runtime for the blocking API could not be started
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    /// Operation needs a tokio runtime it cannot use from here
    #[error("Async runtime unavailable: {details}")]
    NoRuntime { details: String },

    /// Configuration file could not be read or written
    #[error("Configuration file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Configuration file contents are invalid
    #[error("Invalid configuration: {message}")]
    ConfigParse { message: String },
}

impl HarvestError {
    /// Whether the failure happened before or during connection establishment
    /// rather than while reading the presented chain
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HarvestError::Transport { .. } | HarvestError::Timeout { .. }
        )
    }

    /// Short machine-readable kind, used by the JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            HarvestError::InvalidTarget { .. } => "invalid_target",
            HarvestError::Transport { .. } => "transport",
            HarvestError::Timeout { .. } => "timeout",
            HarvestError::CertificateParse { .. } => "certificate_parse",
            HarvestError::NoCertificates { .. } => "no_certificates",
            HarvestError::TlsConfig(_) | HarvestError::ClientBuild(_) => "client_setup",
            HarvestError::ProbeAborted { .. } => "probe_aborted",
            HarvestError::Runtime(_) | HarvestError::NoRuntime { .. } => "runtime",
            HarvestError::ConfigFile { .. } | HarvestError::ConfigParse { .. } => "config",
        }
    }
}

impl From<toml::de::Error> for HarvestError {
    fn from(err: toml::de::Error) -> Self {
        HarvestError::ConfigParse {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HarvestError {
    fn from(err: toml::ser::Error) -> Self {
        HarvestError::ConfigParse {
            message: format!("serialization failed: {}", err),
        }
    }
}
