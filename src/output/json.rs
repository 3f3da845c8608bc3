// JSON Output Module

use crate::harvest::HarvestResult;
use crate::output::ResultRecord;

/// Render one result as a single JSON line
pub fn generate_json_line(result: &HarvestResult) -> serde_json::Result<String> {
    serde_json::to_string(&ResultRecord::from(result))
}

/// Render a whole collection as one JSON array
pub fn generate_json(results: &[HarvestResult], pretty: bool) -> serde_json::Result<String> {
    let records: Vec<ResultRecord> = results.iter().map(ResultRecord::from).collect();
    if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificates::Certificate;
    use crate::error::HarvestError;

    fn success() -> HarvestResult {
        let der = rcgen::generate_simple_self_signed(vec!["example.com".to_string()])
            .unwrap()
            .cert
            .der()
            .to_vec();
        HarvestResult::success(
            "https://example.com/".to_string(),
            vec![Certificate::from_der(&der).unwrap()],
        )
    }

    #[test]
    fn test_json_line_success() {
        let json = generate_json_line(&success()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["target"], "https://example.com/");
        assert_eq!(value["certificates"].as_array().unwrap().len(), 1);
        assert!(value["error"].is_null());
        assert!(!json.contains('\n'));
        assert!(!json.contains("der_bytes"));
    }

    #[test]
    fn test_json_failure_carries_error() {
        let failed = HarvestResult::failure(
            "https://down.example/".to_string(),
            HarvestError::NoCertificates {
                target: "https://down.example/".to_string(),
            },
        );

        let json = generate_json(&[success(), failed], true).unwrap();
        let records: Vec<ResultRecord> = serde_json::from_str(&json).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[1].certificates.is_empty());
        assert_eq!(records[1].error_kind.as_deref(), Some("no_certificates"));
        assert!(json.contains('\n'));
    }
}
