use crate::cache::cache::Cache;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant as StdInstant};
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

/// Periodically removes expired records from a store.
///
/// Lookups already hide expired records, the reaper only bounds
/// memory held by records which are never read again.
pub struct ExpirationReaper {
    store: Arc<dyn Cache + Send + Sync>,
    interval: Duration,
    cancellation_token: CancellationToken,
}

impl ExpirationReaper {
    pub const DEFAULT_INTERVAL_IN_MILIS: u64 = 1000;

    pub fn new(
        store: Arc<dyn Cache + Send + Sync>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        debug!("Creating expiration reaper, interval: {:?}", interval);
        ExpirationReaper {
            store,
            interval,
            cancellation_token,
        }
    }

    pub async fn run(&self) {
        let start = Instant::now() + self.interval;
        let mut interval = interval_at(start, self.interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep();
                }
                _ = self.cancellation_token.cancelled() => {
                    debug!("Expiration reaper stopped");
                    return;
                }
            }
        }
    }

    /// Runs a single sweep, returns number of removed records
    pub fn sweep(&self) -> usize {
        let start = StdInstant::now();
        let removed = self.store.remove_expired();
        let duration = start.elapsed();
        if duration > self.interval * 2 {
            warn!(
                "Expiration sweep removed {} records in: {:?}, records left: {}",
                removed,
                duration,
                self.store.len()
            );
        } else {
            debug!(
                "Expiration sweep removed {} records in: {:?}",
                removed, duration
            );
        }
        removed
    }
}
