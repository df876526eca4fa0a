use crate::cache::cache::Cache;
use crate::memory_store::{
    dash_map_store::DashMapMemoryStore, moka_store::MokaMemoryStore, StoreEngine,
};
use crate::server::timer;
use std::sync::Arc;

pub struct MemcacheStoreConfig {
    store_engine: StoreEngine,
}

impl MemcacheStoreConfig {
    pub fn new(store_engine: StoreEngine) -> MemcacheStoreConfig {
        MemcacheStoreConfig { store_engine }
    }
}

pub struct MemcacheStoreBuilder {}

impl MemcacheStoreBuilder {
    pub fn from_config(
        config: MemcacheStoreConfig,
        timer: Arc<dyn timer::Timer + Send + Sync>,
    ) -> Arc<dyn Cache + Send + Sync> {
        match config.store_engine {
            StoreEngine::DashMap => Arc::new(DashMapMemoryStore::new(timer)),
            StoreEngine::Moka => Arc::new(MokaMemoryStore::new(timer)),
        }
    }
}
