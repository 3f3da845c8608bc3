// Output module - Wire shape and rendering of harvest results

pub mod json;
pub mod terminal;

use crate::certificates::Certificate;
use crate::harvest::HarvestResult;
use serde::{Deserialize, Serialize};

/// Serializable view of one [`HarvestResult`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub target: String,
    pub certificates: Vec<Certificate>,
    pub error: Option<String>,
    pub error_kind: Option<String>,
}

impl From<&HarvestResult> for ResultRecord {
    fn from(result: &HarvestResult) -> Self {
        Self {
            target: result.target.clone(),
            certificates: result.chain.clone(),
            error: result.failure.as_ref().map(|e| e.to_string()),
            error_kind: result.failure.as_ref().map(|e| e.kind().to_string()),
        }
    }
}
