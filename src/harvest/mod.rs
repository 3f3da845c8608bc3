// Harvest module - Fan out one probe per target, fan results back in

pub mod merge;
pub mod probe;
pub mod result;

pub use result::HarvestResult;

use crate::Result;
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tracing::debug;

/// Merged stream of per-target results, in completion order
///
/// Yields exactly one [`HarvestResult`] per submitted target, then ends.
/// Completion of the stream says nothing about success; check each result.
#[derive(Debug)]
pub struct HarvestStream {
    inner: mpsc::Receiver<HarvestResult>,
    submitted: usize,
}

impl HarvestStream {
    /// Next result as it arrives, `None` once every probe has reported
    pub async fn recv(&mut self) -> Option<HarvestResult> {
        self.inner.recv().await
    }

    /// Number of targets submitted, i.e. the number of results to expect
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Drain the stream, returning results in arrival order
    pub async fn drain(mut self) -> Vec<HarvestResult> {
        let mut results = Vec::with_capacity(self.submitted);
        while let Some(result) = self.inner.recv().await {
            results.push(result);
        }
        results
    }
}

impl Stream for HarvestStream {
    type Item = HarvestResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.poll_recv(cx)
    }
}

/// Start harvesting certificate chains from `targets` without waiting
///
/// One probe is spawned per target (duplicates included) and all of them run
/// concurrently. Zero targets give a stream that ends immediately.
///
/// # Panics
///
/// Panics when called outside a tokio runtime; use [`try_harvest`] to get an
/// error instead.
pub fn harvest<I, S>(config: &HarvestConfig, targets: I) -> HarvestStream
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let config = Arc::new(config.clone());

    let probes: Vec<_> = targets
        .into_iter()
        .map(|target| probe::spawn_probe(target.into(), Arc::clone(&config)))
        .collect();

    debug!(
        "Started {} probes (timeout {:?})",
        probes.len(),
        config.effective_timeout()
    );

    HarvestStream {
        submitted: probes.len(),
        inner: merge::merge(probes),
    }
}

/// Like [`harvest`], but reports a missing tokio runtime as an error
pub fn try_harvest<I, S>(config: &HarvestConfig, targets: I) -> Result<HarvestStream>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Handle::try_current().map_err(|e| HarvestError::NoRuntime {
        details: e.to_string(),
    })?;

    Ok(harvest(config, targets))
}

/// Harvest every target and wait for all results
///
/// Results come back in completion order, not submission order.
pub async fn harvest_all<I, S>(config: &HarvestConfig, targets: I) -> Vec<HarvestResult>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    harvest(config, targets).drain().await
}

/// Blocking form of [`harvest_all`] for synchronous callers
///
/// Outside a runtime a multi-threaded one is built for the call. Inside a
/// multi-threaded runtime the current worker blocks in place. A current-thread
/// runtime cannot block without stalling its own harvest tasks, so that case
/// is reported as [`HarvestError::NoRuntime`]. Target failures are always
/// reported in the returned results.
pub fn harvest_blocking<I, S>(config: &HarvestConfig, targets: I) -> Result<Vec<HarvestResult>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let targets: Vec<String> = targets.into_iter().map(Into::into).collect();

    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::MultiThread => Ok(tokio::task::block_in_place(|| {
                handle.block_on(harvest_all(config, targets))
            })),
            flavor => Err(HarvestError::NoRuntime {
                details: format!(
                    "cannot block inside a {:?} runtime; use harvest_all instead",
                    flavor
                ),
            }),
        },
        Err(_) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(HarvestError::Runtime)?;

            Ok(runtime.block_on(harvest_all(config, targets)))
        }
    }
}
