// certharvest - Concurrent TLS certificate chain harvester
// Licensed under GPL-3.0

//! certharvest collects the certificate chains that TLS servers present,
//! without verifying trust. It is an observation tool for auditing and
//! inventory: self-signed, expired and mismatched chains are captured exactly
//! as they are served.
//!
//! One probe runs per target, all concurrently, and their results are merged
//! into a single stream in completion order:
//!
//! ```no_run
//! use certharvest::{HarvestConfig, harvest};
//! use std::time::Duration;
//!
//! # async fn run() {
//! let config = HarvestConfig::new().with_timeout(Duration::from_secs(5));
//! let mut stream = harvest(&config, ["https://example.com", "example.org:443"]);
//! while let Some(result) = stream.recv().await {
//!     match &result.failure {
//!         None => println!("{}: {} certificates", result.target, result.chain.len()),
//!         Some(e) => println!("{}: {}", result.target, e),
//!     }
//! }
//! # }
//! ```

pub mod certificates;
pub mod cli;
pub mod config;
pub mod error;
pub mod harvest;
pub mod output;

// Re-export commonly used types
pub use crate::certificates::Certificate;
pub use crate::cli::Args;
pub use crate::config::HarvestConfig;
pub use crate::error::HarvestError;
pub use crate::harvest::{
    HarvestResult, HarvestStream, harvest, harvest_all, harvest_blocking, try_harvest,
};

/// Result type for certharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;
