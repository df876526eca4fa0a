use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::{
    cache::{cache::Cache, expiration_reaper::ExpirationReaper},
    memcache,
    server::timer,
};

/// Shared state of a running server: the clock, the store,
/// the connection slots of all listeners and the token
/// which stops every task when cancelled.
pub struct ServerContext {
    cancellation_token: CancellationToken,
    connection_limiter: Arc<Semaphore>,
    system_timer: Arc<timer::SystemTimer>,
    store: Arc<dyn Cache + Send + Sync>,
    expiration_reaper: Arc<ExpirationReaper>,
}

impl ServerContext {
    pub fn new(
        store_config: memcache::builder::MemcacheStoreConfig,
        reaper_interval: Duration,
        connection_limit: u32,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let system_timer = Arc::new(timer::SystemTimer::new(cancellation_token.clone()));
        let store = memcache::builder::MemcacheStoreBuilder::from_config(
            store_config,
            system_timer.clone(),
        );
        let expiration_reaper = Arc::new(ExpirationReaper::new(
            store.clone(),
            reaper_interval,
            cancellation_token.clone(),
        ));
        Self {
            cancellation_token,
            connection_limiter: Arc::new(Semaphore::new(connection_limit as usize)),
            system_timer,
            store,
            expiration_reaper,
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn connection_limiter(&self) -> Arc<Semaphore> {
        self.connection_limiter.clone()
    }

    pub fn system_timer(&self) -> Arc<timer::SystemTimer> {
        self.system_timer.clone()
    }

    pub fn store(&self) -> Arc<dyn Cache + Send + Sync> {
        self.store.clone()
    }

    pub fn expiration_reaper(&self) -> Arc<ExpirationReaper> {
        self.expiration_reaper.clone()
    }
}
