// Harvest Result - Per-target outcome record

use crate::certificates::Certificate;
use crate::error::HarvestError;

/// Outcome of probing one target
///
/// Either `chain` is non-empty and `failure` is `None`, or `failure` is set.
/// A certificate parse failure keeps the prefix parsed before the bad entry.
#[derive(Debug)]
pub struct HarvestResult {
    pub target: String,
    pub chain: Vec<Certificate>,
    pub failure: Option<HarvestError>,
}

impl HarvestResult {
    pub fn success(target: String, chain: Vec<Certificate>) -> Self {
        Self {
            target,
            chain,
            failure: None,
        }
    }

    pub fn failure(target: String, error: HarvestError) -> Self {
        Self::partial(target, Vec::new(), error)
    }

    /// Failure after part of the chain was already parsed
    pub fn partial(target: String, chain: Vec<Certificate>, error: HarvestError) -> Self {
        Self {
            target,
            chain,
            failure: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Leaf (server) certificate
    pub fn leaf(&self) -> Option<&Certificate> {
        self.chain.first()
    }

    /// Everything after the leaf, in presentation order
    pub fn intermediates(&self) -> &[Certificate] {
        if self.chain.len() > 1 {
            &self.chain[1..]
        } else {
            &[]
        }
    }

    /// Convert into a plain `Result`, dropping any partial chain on failure
    pub fn into_result(self) -> crate::Result<Vec<Certificate>> {
        match self.failure {
            None => Ok(self.chain),
            Some(e) => Err(e),
        }
    }
}
