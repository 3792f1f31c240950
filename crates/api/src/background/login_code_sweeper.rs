//! Periodic removal of expired login codes.
//!
//! Verification already rejects expired codes; this job only keeps the map
//! from growing with codes nobody came back for.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::login_code::LoginCodeStore;

/// How often the sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(codes: Arc<LoginCodeStore>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Login code sweeper started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Login code sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                let purged = codes.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Login code sweeper: dropped expired codes");
                } else {
                    tracing::debug!("Login code sweeper: nothing to drop");
                }
            }
        }
    }
}
