use crate::cache::cache::{Cache, KeyType, Record, SetStatus, TimeToLive};
use crate::cache::error::{CacheError, Result};
use crate::memory_store::shared_store_state::{get_number_of_shards, SharedStoreState};
use crate::server::timer;

use dashmap::DashMap;
use std::sync::Arc;

type Storage = DashMap<KeyType, Record>;

/// Store sharded by key hash, every shard guarded by its own RwLock
pub struct DashMapMemoryStore {
    memory: Storage,
    store_state: SharedStoreState,
}

impl DashMapMemoryStore {
    pub fn new(timer: Arc<dyn timer::Timer + Send + Sync>) -> DashMapMemoryStore {
        let parallelism = std::thread::available_parallelism().map_or(1, usize::from);
        let shards = get_number_of_shards(parallelism);
        info!("Number of shards: {}", shards);
        DashMapMemoryStore::with_shards(timer, shards)
    }

    pub fn with_shards(
        timer: Arc<dyn timer::Timer + Send + Sync>,
        shards: usize,
    ) -> DashMapMemoryStore {
        DashMapMemoryStore {
            memory: DashMap::with_shard_amount(shards),
            store_state: SharedStoreState::new(timer),
        }
    }
}

impl Cache for DashMapMemoryStore {
    /// Returns a value associated with a key
    fn get(&self, key: &KeyType) -> Result<Record> {
        {
            // shared shard lock on the hot path
            let entry = self.memory.get(key).ok_or(CacheError::NotFound)?;
            if !self.store_state.check_if_expired(entry.value()) {
                return Ok(entry.value().clone());
            }
        }
        // record may have been replaced after the read lock was released,
        // expiration is checked again under the write lock
        let now = self.store_state.timestamp();
        self.memory
            .remove_if(key, |_key, record| SharedStoreState::is_expired_at(record, now));
        Err(CacheError::NotFound)
    }

    fn set(&self, key: KeyType, mut record: Record, ttl: TimeToLive) -> SetStatus {
        let expires_at = self.store_state.set_ttl(&mut record, ttl);
        self.memory.insert(key, record);
        SetStatus { expires_at }
    }

    fn delete(&self, key: KeyType) -> Result<Record> {
        match self.memory.remove(&key) {
            Some((_key, record)) => {
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
        let mut removed: usize = 0;
        // retain locks one shard at a time
        self.memory.retain(|_key, record| {
            let expired = SharedStoreState::is_expired_at(record, now);
            if expired {
                removed += 1;
            }
            !expired
        });
        removed
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}
