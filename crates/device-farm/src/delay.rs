//! Fixed settle delay after device creation.

use std::time::Duration;

use tracing::info;

/// Wait `duration` so the new device can reach a network-attached state.
///
/// Non-blocking; a zero duration returns immediately.
pub async fn settle(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    info!(seconds = duration.as_secs(), "Waiting for device to settle");
    tokio::time::sleep(duration).await;
}
