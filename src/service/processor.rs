//! Concurrent registration processor.
//!
//! A batch is placed on a shared work queue drained by a fixed pool of worker
//! tasks. Each worker registers DevEUIs one at a time and reports on its own
//! success and error channels; two merge stages fan those back into a single
//! pair of streams.
//!
//! ```text
//!                ┌─> worker 0 ─┬─ ok ──┐        ┌──> registered
//!  batch ─> queue├─> worker 1 ─┼─ ok ──┼─ merge ┘
//!                └─> worker N ─┴─ err ─┴─ merge ───> failed
//! ```

use std::sync::Arc;
use std::vec;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::domain::{Batch, DevEui};
use crate::error::RegistrationError;
use crate::registrar::Registrar;

/// Capacity of every result channel. One slot is the closest tokio gets to
/// an unbuffered hand-off: a worker blocks until its previous result has
/// been taken.
const EMIT_CAPACITY: usize = 1;

type WorkQueue = Arc<Mutex<vec::IntoIter<DevEui>>>;

/// Result streams of one [`Processor::process`] call.
///
/// Both streams close only after every worker has finished. They must be
/// drained together: a consumer that ignores one of them stalls the pool.
#[derive(Debug)]
pub struct Outcomes {
    /// DevEUIs acknowledged by the registrar.
    pub registered: mpsc::Receiver<DevEui>,
    /// Classified registration failures.
    pub failed: mpsc::Receiver<RegistrationError>,
}

impl Outcomes {
    /// Drain both streams concurrently until they close.
    pub async fn collect(self) -> (Vec<DevEui>, Vec<RegistrationError>) {
        let Self {
            mut registered,
            mut failed,
        } = self;

        let successes = async {
            let mut out = Vec::new();
            while let Some(eui) = registered.recv().await {
                out.push(eui);
            }
            out
        };

        let failures = async {
            let mut out = Vec::new();
            while let Some(err) = failed.recv().await {
                out.push(err);
            }
            out
        };

        tokio::join!(successes, failures)
    }
}

/// Fans a batch out over a fixed pool of registration workers.
#[derive(Clone)]
pub struct Processor {
    /// Registrar shared by all workers.
    registrar: Arc<dyn Registrar>,
    /// Number of concurrent workers.
    workers: usize,
}

impl Processor {
    /// Create a processor with a fixed worker count.
    ///
    /// A worker count of zero is accepted; such a processor never registers
    /// anything and callers are expected to check [`Processor::workers`].
    pub fn new(registrar: Arc<dyn Registrar>, workers: usize) -> Self {
        Self { registrar, workers }
    }

    /// Configured worker count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Register every DevEUI in `batch`.
    ///
    /// Each DevEUI ends up on exactly one of the two streams, or on neither if
    /// `cancel` fires before a worker picks it up. Cancellation is checked
    /// between DevEUIs; an in-flight registration always completes.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn process(&self, cancel: &CancellationToken, batch: Batch) -> Outcomes {
        let queue: WorkQueue = Arc::new(Mutex::new(batch.into_iter()));

        let mut ok_channels = Vec::with_capacity(self.workers);
        let mut err_channels = Vec::with_capacity(self.workers);

        for worker_id in 0..self.workers {
            let (ok_tx, ok_rx) = mpsc::channel(EMIT_CAPACITY);
            let (err_tx, err_rx) = mpsc::channel(EMIT_CAPACITY);

            tokio::spawn(worker_loop(
                worker_id,
                Arc::clone(&queue),
                Arc::clone(&self.registrar),
                cancel.clone(),
                ok_tx,
                err_tx,
            ));

            ok_channels.push(ok_rx);
            err_channels.push(err_rx);
        }

        Outcomes {
            registered: merge(ok_channels),
            failed: merge(err_channels),
        }
    }
}

/// Worker task: pull DevEUIs off the shared queue until it is empty or
/// cancellation is requested.
async fn worker_loop(
    worker_id: usize,
    queue: WorkQueue,
    registrar: Arc<dyn Registrar>,
    cancel: CancellationToken,
    ok_tx: mpsc::Sender<DevEui>,
    err_tx: mpsc::Sender<RegistrationError>,
) {
    trace!(worker_id, "Registration worker started");

    loop {
        if cancel.is_cancelled() {
            debug!(worker_id, "Cancellation requested, worker stopping");
            break;
        }

        let next = queue.lock().next();
        let Some(eui) = next else {
            break;
        };

        let delivered = match registrar.register(eui).await {
            Ok(()) => {
                metrics::counter!("deveui_registered_total").increment(1);
                ok_tx.send(eui).await.is_ok()
            }
            Err(err) => {
                metrics::counter!(
                    "deveui_registration_failures_total",
                    "reason" => err.reason_label()
                )
                .increment(1);
                err_tx.send(err).await.is_ok()
            }
        };

        if !delivered {
            debug!(worker_id, "Result stream dropped, worker stopping");
            break;
        }
    }

    trace!(worker_id, "Registration worker stopped");
}

/// Fan several receivers into one.
///
/// The returned receiver yields every value from every input and closes once
/// all inputs are exhausted. No ordering is guaranteed across inputs.
pub fn merge<T: Send + 'static>(inputs: Vec<mpsc::Receiver<T>>) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(EMIT_CAPACITY);

    for mut input in inputs {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(value) = input.recv().await {
                if tx.send(value).await.is_err() {
                    break;
                }
            }
        });
    }

    // The output closes when the last forwarder drops its sender
    drop(tx);

    rx
}
