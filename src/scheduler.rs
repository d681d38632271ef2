//! Periodic driver for the expiration sweep.
//!
//! Runs [`crate::core::expiration::run_sweep`] on a fixed interval, forever.
//! A failed sweep is logged and retried on the next tick; one bad run must
//! never take the loop down.

use crate::core::expiration;
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::{debug, error};

/// Runs the expiration sweep every `interval_secs` seconds until the process
/// exits.
pub async fn run(db: DatabaseConnection, interval_secs: u64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;
        match expiration::run_sweep(&db).await {
            Ok(outcome) if outcome.total() > 0 => {
                // run_sweep already logged the counts
            }
            Ok(_) => debug!("expiration sweep found nothing to do"),
            Err(error) => {
                error!(%error, "expiration sweep failed; retrying on next tick");
            }
        }
    }
}
