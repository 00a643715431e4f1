//! Ingestion-run status polling.
//!
//! The poll loop is an explicit state machine over [`RunState`] driven by
//! tokio's clock, so paused-clock tests can simulate long waits without
//! real delays and callers can bound the wait with a deadline.

use std::time::Duration;

use tracing::{debug, info};

use crate::api::{IngestionStatus, PlatformApi};
use crate::error::{CloudError, Result};

/// The poller's view of an ingestion run, derived from each status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Non-terminal; keep polling. Unrecognized statuses land here.
    Pending,
    /// Terminal success.
    Succeeded,
    /// Terminal failure.
    Failed,
}

impl From<IngestionStatus> for RunState {
    fn from(status: IngestionStatus) -> Self {
        match status {
            IngestionStatus::Success => RunState::Succeeded,
            IngestionStatus::Error => RunState::Failed,
            IngestionStatus::Pending | IngestionStatus::Unknown => RunState::Pending,
        }
    }
}

/// Polls an ingestion run until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct IngestionPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl Default for IngestionPoller {
    /// One-second interval, no deadline (the historical behavior: a stalled
    /// run is waited on indefinitely).
    fn default() -> Self {
        Self { interval: Duration::from_secs(1), timeout: None }
    }
}

impl IngestionPoller {
    /// Create a poller with the default one-second interval and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between status checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bound the total wait; the run fails with
    /// [`CloudError::IngestionTimeout`] once the deadline passes while the
    /// run is still pending.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Poll the run's status until it is terminal.
    ///
    /// `progress` is invoked once per non-terminal check, after the status
    /// has been read and before the sleep; callers use it for console
    /// progress output.
    ///
    /// # Errors
    ///
    /// - [`CloudError::IngestionFailed`] when the run reports an error status.
    /// - [`CloudError::IngestionTimeout`] when a deadline is configured and
    ///   passes before the run becomes terminal.
    /// - Any status-check transport error, propagated unmodified.
    pub async fn wait_until_terminal(
        &self,
        api: &dyn PlatformApi,
        pipeline_id: &str,
        run_id: &str,
        mut progress: impl FnMut(),
    ) -> Result<()> {
        let deadline = self.timeout.map(|t| tokio::time::Instant::now() + t);
        let mut checks: u64 = 0;

        loop {
            let response = api.get_ingestion_status(pipeline_id, run_id).await?;
            checks += 1;

            match RunState::from(response.status) {
                RunState::Succeeded => {
                    info!(pipeline_id, run_id, checks, "ingestion completed");
                    return Ok(());
                }
                RunState::Failed => {
                    return Err(CloudError::IngestionFailed);
                }
                RunState::Pending => {
                    if let Some(deadline) = deadline {
                        if tokio::time::Instant::now() >= deadline {
                            return Err(CloudError::IngestionTimeout(
                                self.timeout.unwrap_or_default(),
                            ));
                        }
                    }
                    debug!(pipeline_id, run_id, checks, "ingestion still pending");
                    progress();
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_state() {
        assert_eq!(RunState::from(IngestionStatus::Pending), RunState::Pending);
        assert_eq!(RunState::from(IngestionStatus::Unknown), RunState::Pending);
        assert_eq!(RunState::from(IngestionStatus::Success), RunState::Succeeded);
        assert_eq!(RunState::from(IngestionStatus::Error), RunState::Failed);
    }
}
