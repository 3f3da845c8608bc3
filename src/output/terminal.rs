// Terminal Output Module - Human-readable rendering of harvest results

use crate::certificates::Certificate;
use crate::harvest::HarvestResult;
use colored::*;
use std::fmt;

impl fmt::Display for HarvestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => writeln!(
                f,
                "{} {} ({} certificate{})",
                "[+]".green(),
                self.target.green().bold(),
                self.chain.len(),
                if self.chain.len() == 1 { "" } else { "s" }
            )?,
            Some(e) => writeln!(f, "{} {}: {}", "[-]".red(), self.target.bold(), e)?,
        }

        for (idx, cert) in self.chain.iter().enumerate() {
            let role = if idx == 0 { "leaf" } else { "chain" };
            write_certificate(f, idx, role, cert)?;
        }

        Ok(())
    }
}

fn write_certificate(
    f: &mut fmt::Formatter<'_>,
    idx: usize,
    role: &str,
    cert: &Certificate,
) -> fmt::Result {
    writeln!(f, "  #{} {} {}", idx, format!("[{}]", role).cyan(), cert.subject)?;
    writeln!(f, "      Issuer:      {}", cert.issuer)?;
    writeln!(f, "      Valid:       {} -> {}", cert.not_before, cert.not_after)?;
    if !cert.san.is_empty() {
        writeln!(f, "      SAN:         {}", cert.san.join(", "))?;
    }
    if cert.is_ca {
        writeln!(f, "      CA:          {}", "yes".yellow())?;
    }
    writeln!(f, "      SHA256:      {}", cert.fingerprint_sha256.dimmed())
}

/// One-line tally printed after all results
pub fn summary_line(succeeded: usize, failed: usize) -> String {
    format!(
        "{} {} harvested, {} failed",
        "Summary:".cyan().bold(),
        succeeded.to_string().green(),
        if failed == 0 {
            failed.to_string().normal()
        } else {
            failed.to_string().red()
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvestError;

    #[test]
    fn test_display_success_lists_chain() {
        colored::control::set_override(false);

        let der = rcgen::generate_simple_self_signed(vec!["display.example".to_string()])
            .unwrap()
            .cert
            .der()
            .to_vec();
        let result = HarvestResult::success(
            "https://display.example/".to_string(),
            vec![Certificate::from_der(&der).unwrap()],
        );

        let text = result.to_string();
        assert!(text.contains("https://display.example/ (1 certificate)"));
        assert!(text.contains("[leaf]"));
        assert!(text.contains("display.example"));
    }

    #[test]
    fn test_display_failure() {
        colored::control::set_override(false);

        let result = HarvestResult::failure(
            "https://down.example/".to_string(),
            HarvestError::NoCertificates {
                target: "https://down.example/".to_string(),
            },
        );

        let text = result.to_string();
        assert!(text.starts_with("[-]"));
        assert!(text.contains("No certificates presented"));
    }

    #[test]
    fn test_summary_line() {
        colored::control::set_override(false);
        assert_eq!(summary_line(3, 1), "Summary: 3 harvested, 1 failed");
    }
}
