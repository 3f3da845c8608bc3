// CLI module - Command line interface and argument parsing

use crate::Result;
use crate::config::HarvestConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// certharvest - Harvest the TLS certificate chains servers present
///
/// Trust is never verified: every chain is captured as presented, including
/// self-signed, expired and mismatched certificates.
#[derive(Parser, Debug, Clone)]
#[command(name = "certharvest", version, about, long_about = None)]
pub struct Args {
    /// Targets to probe (https URL, host or host:port)
    #[arg(value_name = "TARGET", required_unless_present = "config_example")]
    pub targets: Vec<String>,

    /// Connection timeout in seconds (0 = default of 10s)
    #[arg(short = 't', long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Load configuration from a TOML file; flags override its values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write an example configuration file and exit
    #[arg(long = "config-example", value_name = "FILE")]
    pub config_example: Option<PathBuf>,

    /// User-Agent sent with the probe request
    #[arg(long = "user-agent", value_name = "UA")]
    pub user_agent: Option<String>,

    /// Emit one JSON object per result instead of the terminal view
    #[arg(long = "json")]
    pub json: bool,

    /// With --json, collect everything and print one pretty JSON array
    #[arg(long = "pretty", requires = "json")]
    pub pretty: bool,

    /// Wait for every probe before printing anything
    #[arg(long = "blocking")]
    pub blocking: bool,
}

impl Args {
    /// Resolve the effective configuration: file first, then CLI overrides
    pub fn harvest_config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };

        if let Some(secs) = self.timeout {
            let timeout =
                Duration::try_from_secs_f64(secs).map_err(|e| crate::HarvestError::ConfigParse {
                    message: format!("invalid timeout {}: {}", secs, e),
                })?;
            config = config.with_timeout(timeout);
        }

        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }

        Ok(config)
    }

    /// Whether results should be collected before output
    pub fn collects_first(&self) -> bool {
        self.blocking || self.pretty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_targets_and_timeout() {
        let args = Args::parse_from(["certharvest", "-t", "2.5", "example.com", "https://example.org"]);

        assert_eq!(args.targets, vec!["example.com", "https://example.org"]);
        let config = args.harvest_config().unwrap();
        assert_eq!(config.connection_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_targets_required() {
        assert!(Args::try_parse_from(["certharvest"]).is_err());
        assert!(Args::try_parse_from(["certharvest", "--config-example", "out.toml"]).is_ok());
    }

    #[test]
    fn test_pretty_requires_json() {
        assert!(Args::try_parse_from(["certharvest", "--pretty", "example.com"]).is_err());

        let args = Args::parse_from(["certharvest", "--json", "--pretty", "example.com"]);
        assert!(args.collects_first());
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let args = Args::parse_from(["certharvest", "--timeout=-1", "example.com"]);
        assert!(args.harvest_config().is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection_timeout_seconds = 30\nuser_agent = \"from-file\"").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = Args::parse_from(["certharvest", "-c", &path, "-t", "1", "example.com"]);
        let config = args.harvest_config().unwrap();

        assert_eq!(config.connection_timeout, Duration::from_secs(1));
        assert_eq!(config.user_agent.as_deref(), Some("from-file"));
    }
}
