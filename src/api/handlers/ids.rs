//! Idempotent DevEUI batch issuance handler.

use axum::{
    Json,
    extract::{Path, State},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::domain::{DevEui, IdempotencyKey};
use crate::error::Result;
use crate::service::{Generator, RngSource};

/// Generate and register a batch seeded by the idempotency key.
///
/// The same key and batch size always produce the same DevEUIs, so a client
/// can repeat a request to recover registrations that failed the first time.
/// Returns the registered DevEUIs sorted by full form.
pub async fn issue_batch(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<DevEui>>> {
    let key: IdempotencyKey = key.parse()?;
    let batch_size = state.config.issuance.batch_size;

    let batch = Generator::new(RngSource::seeded(key.seed())).generate(batch_size)?;

    // Dropping this handler (client went away) cancels outstanding work
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let (mut registered, failed) = state.processor().process(&cancel, batch).collect().await;

    // Failures are recovered by repeating the request with the same key
    if !failed.is_empty() {
        warn!(
            key = %key,
            failed = failed.len(),
            "Some DevEUIs could not be registered"
        );
    }

    registered.sort_unstable();
    info!(key = %key, registered = registered.len(), batch_size, "Batch issued");

    Ok(Json(registered))
}
