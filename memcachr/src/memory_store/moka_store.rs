use crate::cache::cache::{Cache, KeyType, Record, SetStatus, TimeToLive};
use crate::cache::error::{CacheError, Result};
use crate::memory_store::shared_store_state::SharedStoreState;
use crate::server::timer;
use moka::ops::compute::Op;
use moka::sync::Cache as MokaCache;
use std::sync::Arc;

type MokaStorage = MokaCache<KeyType, Record>;

/// Store based on moka concurrent cache, built without capacity
/// so records are never evicted by size
pub struct MokaMemoryStore {
    memory: MokaStorage,
    store_state: SharedStoreState,
}

impl MokaMemoryStore {
    pub fn new(timer: Arc<dyn timer::Timer + Send + Sync>) -> MokaMemoryStore {
        MokaMemoryStore {
            memory: MokaCache::builder().build(),
            store_state: SharedStoreState::new(timer),
        }
    }

    /// Removes record only if it is still expired at `now`,
    /// returns true if record was removed
    fn remove_if_expired(&self, key: KeyType, now: u64) -> bool {
        let mut removed = false;
        let _entry = self
            .memory
            .entry(key)
            .and_compute_with(|maybe_entry| match maybe_entry {
                Some(entry) if SharedStoreState::is_expired_at(entry.value(), now) => {
                    removed = true;
                    Op::Remove
                }
                _ => Op::Nop,
            });
        removed
    }
}

impl Cache for MokaMemoryStore {
    /// Returns a value associated with a key
    fn get(&self, key: &KeyType) -> Result<Record> {
        let record = self.memory.get(key).ok_or(CacheError::NotFound)?;
        if !self.store_state.check_if_expired(&record) {
            return Ok(record);
        }
        let now = self.store_state.timestamp();
        self.remove_if_expired(key.clone(), now);
        Err(CacheError::NotFound)
    }

    fn set(&self, key: KeyType, mut record: Record, ttl: TimeToLive) -> SetStatus {
        let expires_at = self.store_state.set_ttl(&mut record, ttl);
        self.memory.insert(key, record);
        SetStatus { expires_at }
    }

    fn delete(&self, key: KeyType) -> Result<Record> {
        match self.memory.remove(&key) {
            Some(record) => {
                if self.store_state.check_if_expired(&record) {
                    return Err(CacheError::NotFound);
                }
                Ok(record)
            }
            None => Err(CacheError::NotFound),
        }
    }

    fn remove_expired(&self) -> usize {
        let now = self.store_state.timestamp();
        let expired: Vec<KeyType> = self
            .memory
            .iter()
            .filter(|(_key, record)| SharedStoreState::is_expired_at(record, now))
            .map(|(key, _record)| (*key).clone())
            .collect();

        let removed = expired
            .into_iter()
            .filter(|key| self.remove_if_expired(key.clone(), now))
            .count();
        self.memory.run_pending_tasks();
        removed
    }

    fn len(&self) -> usize {
        self.memory.run_pending_tasks();
        self.memory.entry_count() as usize
    }
}
