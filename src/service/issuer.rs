//! Batch issuance loop.
//!
//! Keeps generating and registering DevEUIs until the target number has been
//! registered or cancellation is requested. Failed DevEUIs are never
//! resubmitted; the shortfall is made up with freshly drawn ones.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{DevEui, MAX_BATCH};
use crate::error::{AppError, ErrorCode, Result};
use crate::service::generator::Generator;
use crate::service::processor::Processor;
use crate::service::random::RandomSource;

/// Summary of an issuance run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueReport {
    /// Registered DevEUIs in registration order.
    pub registered: Vec<DevEui>,
    /// Number of failed registrations across all rounds.
    pub failures: usize,
    /// Number of generate/process rounds started.
    pub rounds: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl IssueReport {
    /// Registered DevEUIs sorted by full form.
    #[must_use]
    pub fn sorted(&self) -> Vec<DevEui> {
        let mut registered = self.registered.clone();
        registered.sort_unstable();
        registered
    }
}

/// Drives generator and processor rounds until a target is met.
pub struct Issuer {
    processor: Processor,
    retry_backoff: Duration,
}

impl Issuer {
    /// Create an issuer.
    pub const fn new(processor: Processor, retry_backoff: Duration) -> Self {
        Self {
            processor,
            retry_backoff,
        }
    }

    /// Register `target` DevEUIs drawn from `generator`.
    ///
    /// Cancellation is checked between rounds (and by the processor between
    /// DevEUIs); a cancelled run returns what has been registered so far with
    /// [`IssueReport::cancelled`] set. A round generates at most [`MAX_BATCH`]
    /// DevEUIs, so larger targets take several rounds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] when `target` is non-zero but the
    /// processor has no workers, since no round could ever make progress.
    pub async fn issue<R: RandomSource>(
        &self,
        target: usize,
        generator: &mut Generator<R>,
        cancel: &CancellationToken,
    ) -> Result<IssueReport> {
        if target > 0 && self.processor.workers() == 0 {
            return Err(AppError::InvalidConfig(
                "cannot issue DevEUIs with zero workers".to_string(),
            ));
        }

        let mut report = IssueReport {
            registered: Vec::with_capacity(target.min(MAX_BATCH)),
            ..IssueReport::default()
        };

        while report.registered.len() < target {
            if cancel.is_cancelled() {
                warn!(
                    registered = report.registered.len(),
                    wanted = target,
                    "Issuance terminated early"
                );
                report.cancelled = true;
                break;
            }

            let remaining = target - report.registered.len();
            report.rounds += 1;
            info!(round = report.rounds, remaining, "Registering DevEUIs");

            let batch = match generator.generate(remaining.min(MAX_BATCH)) {
                Ok(batch) => batch,
                Err(err) => {
                    metrics::counter!("deveui_generation_failures_total").increment(1);
                    warn!(round = report.rounds, error = %err, "Error generating DevEUIs");
                    self.backoff(cancel).await;
                    continue;
                }
            };

            let (registered, failed) = self.processor.process(cancel, batch).collect().await;

            for err in &failed {
                warn!(
                    eui = %err.eui(),
                    error_code = ErrorCode::from(err).as_i32(),
                    error = %err,
                    "Registration failed"
                );
            }
            for eui in &registered {
                info!(%eui, "Registered");
            }

            report.failures += failed.len();
            let progressed = !registered.is_empty();
            report.registered.extend(registered);

            if !progressed && report.registered.len() < target {
                self.backoff(cancel).await;
            }
        }

        info!(
            registered = report.registered.len(),
            failures = report.failures,
            rounds = report.rounds,
            "Issuance finished"
        );

        Ok(report)
    }

    /// Sleep for the retry backoff, waking early on cancellation.
    async fn backoff(&self, cancel: &CancellationToken) {
        if self.retry_backoff.is_zero() {
            return;
        }

        tokio::select! {
            () = cancel.cancelled() => {}
            () = tokio::time::sleep(self.retry_backoff) => {}
        }
    }
}
