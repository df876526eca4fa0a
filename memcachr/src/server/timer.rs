use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

/// Source of the current time used for expiration.
/// Timestamps are milliseconds elapsed since the timer was created.
pub trait Timer {
    fn timestamp(&self) -> u64;
}

pub trait SetableTimer {
    fn refresh(&self);
}

/// Clock shared by all connections.
///
/// Reading the clock is a single atomic load; the value is refreshed
/// by [`SystemTimer::run`] every `resolution`.
pub struct SystemTimer {
    millis: AtomicU64,
    start: std::time::Instant,
    resolution: Duration,
    cancellation_token: CancellationToken,
}

impl SystemTimer {
    const DEFAULT_RESOLUTION_IN_MILIS: u64 = 10;

    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self::with_resolution(
            Duration::from_millis(SystemTimer::DEFAULT_RESOLUTION_IN_MILIS),
            cancellation_token,
        )
    }

    pub fn with_resolution(resolution: Duration, cancellation_token: CancellationToken) -> Self {
        debug!("Creating system timer, resolution: {:?}", resolution);
        SystemTimer {
            millis: AtomicU64::new(0),
            start: std::time::Instant::now(),
            resolution,
            cancellation_token,
        }
    }

    pub async fn run(&self) {
        let start = Instant::now();
        let mut interval = interval_at(start, self.resolution);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.refresh();
                    trace!("Server tick: {}", self.timestamp());
                }
                _ = self.cancellation_token.cancelled() => {
                    debug!("System timer stopped");
                    return;
                }
            }
        }
    }
}

impl Timer for SystemTimer {
    fn timestamp(&self) -> u64 {
        self.millis.load(Ordering::Acquire)
    }
}

impl SetableTimer for SystemTimer {
    fn refresh(&self) {
        // stored from the wall clock instead of incremented, ticks may be skipped
        let elapsed = self.start.elapsed().as_millis() as u64;
        self.millis.fetch_max(elapsed, Ordering::Release);
    }
}
