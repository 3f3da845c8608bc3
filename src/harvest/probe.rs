// Probe - One TLS-over-HTTP connection attempt that captures the presented chain

use crate::Result;
use crate::certificates::{CapturedChain, ChainInterceptor};
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::harvest::HarvestResult;
use futures::FutureExt;
use rustls::ClientConfig;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

/// Turn a target into the https URL that is actually requested
///
/// Bare `host` and `host:port` targets get an `https://` scheme; any other
/// scheme cannot present a TLS chain and is rejected.
pub fn normalize_target(target: &str) -> Result<Url> {
    let candidate = if has_scheme(target) {
        target.to_string()
    } else {
        format!("https://{}", target)
    };

    let url = Url::parse(&candidate).map_err(|e| HarvestError::InvalidTarget {
        target: target.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "https" {
        return Err(HarvestError::InvalidTarget {
            target: target.to_string(),
            reason: format!("scheme '{}' does not negotiate TLS", url.scheme()),
        });
    }

    Ok(url)
}

// A scheme is a letter followed by letters, digits, '+', '-' or '.', then "://"
fn has_scheme(target: &str) -> bool {
    match target.split_once("://") {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Spawn a probe for one target and return the channel its result arrives on
///
/// Exactly one result is sent, after which the channel closes. A probe that
/// panics still reports, as [`HarvestError::ProbeAborted`].
pub fn spawn_probe(target: String, config: Arc<HarvestConfig>) -> mpsc::Receiver<HarvestResult> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let result = match AssertUnwindSafe(probe(target.clone(), &config))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("Probe for {} panicked", target);
                let details = "probe task panicked".to_string();
                HarvestResult::failure(target.clone(), HarvestError::ProbeAborted { target, details })
            }
        };

        if tx.send(result).await.is_err() {
            debug!("Result stream dropped before probe finished");
        }
    });

    rx
}

/// Probe one target, returning its result once the attempt completes
pub async fn probe(target: String, config: &HarvestConfig) -> HarvestResult {
    debug!("Probing {}", target);
    let start = Instant::now();

    let url = match normalize_target(&target) {
        Ok(url) => url,
        Err(e) => return HarvestResult::failure(target, e),
    };

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let interceptor = Arc::new(ChainInterceptor::new(&provider));

    let client = match build_client(config, provider, Arc::clone(&interceptor)) {
        Ok(client) => client,
        Err(e) => return HarvestResult::failure(target, e),
    };

    let limit = config.effective_timeout();
    let transport_failure = match timeout(limit, client.get(url).send()).await {
        Ok(Ok(response)) => {
            debug!("{} answered with HTTP {}", target, response.status());
            None
        }
        Ok(Err(e)) if e.is_timeout() => Some(HarvestError::Timeout {
            target: target.clone(),
            duration: limit,
        }),
        Ok(Err(e)) => Some(HarvestError::Transport {
            target: target.clone(),
            source: e,
        }),
        Err(_) => Some(HarvestError::Timeout {
            target: target.clone(),
            duration: limit,
        }),
    };

    let result = settle(target, interceptor.take(), transport_failure);

    match &result.failure {
        None => debug!(
            "Captured {} certificates from {} in {:.2}s",
            result.chain.len(),
            result.target,
            start.elapsed().as_secs_f64()
        ),
        Some(e) => warn!("{}", e),
    }

    result
}

/// Decide the single outcome of a probe
///
/// A recorded parse failure wins over the transport error it caused and keeps
/// its parsed prefix. Any other failure carries an empty chain.
fn settle(
    target: String,
    captured: CapturedChain,
    transport_failure: Option<HarvestError>,
) -> HarvestResult {
    let CapturedChain {
        certificates,
        failure,
    } = captured;

    if let Some(parse_failure) = failure {
        return HarvestResult::partial(target, certificates, parse_failure);
    }

    if let Some(e) = transport_failure {
        return HarvestResult::failure(target, e);
    }

    if certificates.is_empty() {
        let error = HarvestError::NoCertificates {
            target: target.clone(),
        };
        return HarvestResult::failure(target, error);
    }

    HarvestResult::success(target, certificates)
}

/// Build a single-use HTTP client whose TLS layer reports to `interceptor`
fn build_client(
    config: &HarvestConfig,
    provider: Arc<rustls::crypto::CryptoProvider>,
    interceptor: Arc<ChainInterceptor>,
) -> Result<reqwest::Client> {
    let tls = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(interceptor)
        .with_no_client_auth();

    let limit = config.effective_timeout();

    reqwest::Client::builder()
        .use_preconfigured_tls(tls)
        .timeout(limit)
        .connect_timeout(limit)
        .redirect(reqwest::redirect::Policy::none()) // Observe only the requested peer
        .pool_max_idle_per_host(0)
        .user_agent(config.effective_user_agent())
        .build()
        .map_err(HarvestError::ClientBuild)
}
