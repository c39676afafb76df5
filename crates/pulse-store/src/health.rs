//! Backend reachability checks.
//!
//! A freshly started deployment can take a while before `/version` answers.
//! [`wait_until_healthy`] polls it once per interval until it does or the
//! deadline passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::client::BackendClient;
use crate::error::StoreError;

/// Result of one or more health probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub healthy: bool,
    pub version: Option<String>,
    pub attempts: u32,
    pub elapsed: Duration,
    pub last_error: Option<String>,
}

/// Anything that can report a deployment version.
pub trait VersionProbe: Send + Sync {
    fn version(&self) -> impl Future<Output = Result<String, StoreError>> + Send;
}

impl VersionProbe for BackendClient {
    async fn version(&self) -> Result<String, StoreError> {
        Self::version(self).await
    }
}

/// Probe once.
pub async fn probe<P: VersionProbe>(target: &P) -> HealthReport {
    wait_until_healthy(target, Duration::ZERO, Duration::ZERO, |_| {}).await
}

/// Probe every `interval` until the backend answers or `timeout` elapses.
/// A zero `interval` probes exactly once.
///
/// `on_attempt` is called after every failed attempt with the time spent so
/// far, so callers can show progress.
pub async fn wait_until_healthy<P, F>(
    target: &P,
    timeout: Duration,
    interval: Duration,
    mut on_attempt: F,
) -> HealthReport
where
    P: VersionProbe,
    F: FnMut(Duration),
{
    let start = Instant::now();
    let mut attempts = 0u32;
    let last_error = loop {
        attempts += 1;
        let error = match target.version().await {
            Ok(version) => {
                tracing::debug!(%version, attempts, "backend is healthy");
                return HealthReport {
                    healthy: true,
                    version: Some(version),
                    attempts,
                    elapsed: start.elapsed(),
                    last_error: None,
                };
            }
            Err(error) => error,
        };
        tracing::debug!(%error, attempts, "backend not ready");

        let elapsed = start.elapsed();
        if interval.is_zero() || elapsed + interval > timeout {
            break error.to_string();
        }
        on_attempt(elapsed);
        tokio::time::sleep(interval).await;
    };

    HealthReport {
        healthy: false,
        version: None,
        attempts,
        elapsed: start.elapsed(),
        last_error: Some(last_error),
    }
}
