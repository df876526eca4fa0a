use crate::cache::cache::{
    Cache, CacheMetaData as CacheMeta, KeyType as CacheKeyType, Record as CacheRecord,
    SetStatus as CacheSetStatus, TimeToLive,
};
use crate::cache::error::Result;
use std::sync::Arc;

pub type Record = CacheRecord;
pub type Meta = CacheMeta;
pub type SetStatus = CacheSetStatus;
pub type KeyType = CacheKeyType;

/**
 * Implements Memcache commands based
 * on Key Value Store
 */
pub struct MemcStore {
    store: Arc<dyn Cache + Send + Sync>,
}

impl MemcStore {
    pub fn new(store: Arc<dyn Cache + Send + Sync>) -> MemcStore {
        MemcStore { store }
    }

    pub fn set(&self, key: KeyType, record: Record, ttl: TimeToLive) -> SetStatus {
        self.store.set(key, record, ttl)
    }

    pub fn get(&self, key: &KeyType) -> Result<Record> {
        self.store.get(key)
    }

    /// Looks up all keys, misses are skipped, hits keep request order
    pub fn get_many(&self, keys: &[KeyType]) -> Vec<(KeyType, Record)> {
        keys.iter()
            .filter_map(|key| {
                self.store
                    .get(key)
                    .ok()
                    .map(|record| (key.clone(), record))
            })
            .collect()
    }

    pub fn delete(&self, key: KeyType) -> Result<Record> {
        self.store.delete(key)
    }

    pub fn get_cache(&self) -> Arc<dyn Cache + Send + Sync> {
        Arc::clone(&self.store)
    }
}
