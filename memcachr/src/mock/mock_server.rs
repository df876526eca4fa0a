use crate::cache::cache::Cache;
use crate::memcache::store::MemcStore;
use crate::memory_store::dash_map_store::DashMapMemoryStore;
use crate::memory_store::moka_store::MokaMemoryStore as MokaStore;
use crate::server::timer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct MockSystemTimer {
    pub current_time: AtomicU64,
}

pub trait SetableTimer: timer::Timer {
    fn set(&self, time: u64);
    fn add_seconds(&self, seconds: u64);
}

impl MockSystemTimer {
    pub fn new() -> Self {
        MockSystemTimer {
            current_time: AtomicU64::new(0),
        }
    }
}

impl Default for MockSystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl timer::Timer for MockSystemTimer {
    fn timestamp(&self) -> u64 {
        self.current_time.load(Ordering::Acquire)
    }
}

impl SetableTimer for MockSystemTimer {
    fn set(&self, time: u64) {
        self.current_time.store(time, Ordering::Release)
    }

    fn add_seconds(&self, seconds: u64) {
        self.current_time
            .fetch_add(seconds * 1000, Ordering::Release);
    }
}

/// Store facade over an engine driven by a settable clock
pub struct MockServer {
    pub timer: Arc<MockSystemTimer>,
    pub storage: Arc<MemcStore>,
}

impl MockServer {
    pub fn new<F>(create_store: F) -> Self
    where
        F: FnOnce(Arc<MockSystemTimer>) -> Arc<dyn Cache + Send + Sync>,
    {
        let timer = Arc::new(MockSystemTimer::new());
        let store = create_store(timer.clone());
        MockServer {
            timer,
            storage: Arc::new(MemcStore::new(store)),
        }
    }
}

pub fn create_moka_server() -> MockServer {
    MockServer::new(|timer| Arc::new(MokaStore::new(timer)))
}

pub fn create_dash_map_server() -> MockServer {
    MockServer::new(|timer| Arc::new(DashMapMemoryStore::new(timer)))
}
