use crate::cache::cache::{Record, TimeToLive};
use crate::server::timer::Timer;
use std::sync::Arc;

/// State and expiration rules shared by store backends
pub struct SharedStoreState {
    timer: Arc<dyn Timer + Send + Sync>,
}

impl SharedStoreState {
    const MILIS_IN_SECOND: u64 = 1000;

    pub fn new(timer: Arc<dyn Timer + Send + Sync>) -> SharedStoreState {
        SharedStoreState { timer }
    }

    /// Resolves relative ttl into an absolute expiration timestamp,
    /// clock is read once per write.
    pub fn set_ttl(&self, record: &mut Record, ttl: TimeToLive) -> Option<u64> {
        record.header.expires_at = match ttl {
            TimeToLive::Infinite => None,
            TimeToLive::Seconds(seconds) => Some(
                self.timestamp()
                    .saturating_add(seconds as u64 * SharedStoreState::MILIS_IN_SECOND),
            ),
            TimeToLive::Expired => Some(0),
        };
        record.header.expires_at
    }

    pub fn timestamp(&self) -> u64 {
        self.timer.timestamp()
    }

    /// The only liveness rule: record is expired once now >= expires_at.
    /// Used both by lookups and by the expiration reaper.
    #[inline]
    pub fn is_expired_at(record: &Record, now: u64) -> bool {
        match record.header.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }

    pub fn check_if_expired(&self, record: &Record) -> bool {
        if record.header.expires_at.is_none() {
            return false;
        }
        SharedStoreState::is_expired_at(record, self.timestamp())
    }
}

// This function is used to get the number of shards based on the available parallelism.
// It calculates the optimal number of shards based on the square of the parallelism divided by 4.
// It then finds the closest power of 2 to that number and returns it.
pub fn get_number_of_shards(parallelism: usize) -> usize {
    let parallelism = parallelism.max(2);
    let parallelism = parallelism.min(192);

    let optimal_number_shards = parallelism.pow(2) / 4;
    if optimal_number_shards < 2 {
        return 2;
    }

    let closest_power_of_2 = optimal_number_shards.ilog2();
    let shards_power_of_2 = 2usize.pow(closest_power_of_2);
    debug!("Available parallelism: {}", parallelism);
    debug!("Optimal number of shards: {}", optimal_number_shards);

    if shards_power_of_2 > 1 {
        shards_power_of_2
    } else {
        2
    }
}
