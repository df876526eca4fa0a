extern crate core_affinity;
use crate::memcache::cli::parser::{MemcachrdConfig, RuntimeType};
use crate::memcache_server::memc_tcp::{MemcacheServerConfig, MemcacheTcpServer};
use crate::memcache_server::server_context::ServerContext;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Builder;

fn get_worker_thread_name() -> String {
    static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
    let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
    format!("memcachrd-wrk-{}", id)
}

fn create_multi_thread_runtime(worker_threads: usize) -> io::Result<tokio::runtime::Runtime> {
    Builder::new_multi_thread()
        .thread_name_fn(get_worker_thread_name)
        .worker_threads(worker_threads)
        .enable_all()
        .build()
}

fn create_current_thread_runtime() -> io::Result<tokio::runtime::Runtime> {
    Builder::new_current_thread()
        .thread_name_fn(get_worker_thread_name)
        .enable_all()
        .build()
}

fn get_server_config(config: &MemcachrdConfig) -> MemcacheServerConfig {
    MemcacheServerConfig::new(
        config.idle_timeout,
        config.max_item_size as u32,
        config.listen_backlog,
    )
}

/// Every worker thread runs its own listener bound with SO_REUSEPORT,
/// the kernel spreads connections between them.
/// All listeners take connection slots from one semaphore.
fn start_current_thread_server(
    config: MemcachrdConfig,
    ctxt: &ServerContext,
) -> Vec<std::thread::JoinHandle<()>> {
    let addr = SocketAddr::new(config.listen, config.port);
    let memc_config = get_server_config(&config);
    let core_ids = core_affinity::get_core_ids().unwrap_or_default();
    let mut handles = Vec::with_capacity(config.threads);

    for i in 0..config.threads.max(1) {
        let store = ctxt.store();
        let limit_connections = ctxt.connection_limiter();
        let cancellation_token = ctxt.cancellation_token();
        let core_id = core_ids.get(i % core_ids.len().max(1)).copied();
        let handle = std::thread::spawn(move || {
            debug!("Creating runtime {}", i);
            match core_id {
                Some(core_id) if core_affinity::set_for_current(core_id) => {
                    debug!(
                        "Thread pinned {:?} to core {:?}",
                        std::thread::current().id(),
                        core_id.id
                    );
                }
                Some(core_id) => warn!("Cannot pin thread to core {}", core_id.id),
                None => warn!("Cannot read core ids, thread {} not pinned", i),
            }
            let child_runtime = match create_current_thread_runtime() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("Cannot create runtime {}: {}", i, err);
                    cancellation_token.cancel();
                    return;
                }
            };
            let mut tcp_server = MemcacheTcpServer::new(
                memc_config,
                store,
                limit_connections,
                cancellation_token.clone(),
            );
            if let Err(err) = child_runtime.block_on(tcp_server.run(addr)) {
                error!("Listener {} stopped: {}", i, err);
                cancellation_token.cancel();
            }
        });
        handles.push(handle);
    }
    handles
}

fn start_threadpool_server(
    config: MemcachrdConfig,
    ctxt: &ServerContext,
    runtime: &tokio::runtime::Runtime,
) {
    let addr = SocketAddr::new(config.listen, config.port);
    let cancellation_token = ctxt.cancellation_token();
    let mut tcp_server = MemcacheTcpServer::new(
        get_server_config(&config),
        ctxt.store(),
        ctxt.connection_limiter(),
        cancellation_token.clone(),
    );
    runtime.spawn(async move {
        if let Err(err) = tcp_server.run(addr).await {
            error!("Listener stopped: {}", err);
            cancellation_token.cancel();
        }
    });
}

/// Starts listeners, the expiration reaper and the clock.
/// Blocks until the context cancellation token is cancelled.
pub fn start_memcachr_server_with_ctxt(config: MemcachrdConfig, ctxt: ServerContext) {
    let parent_runtime = match config.runtime_type {
        RuntimeType::CurrentThread => create_current_thread_runtime(),
        RuntimeType::MultiThread => create_multi_thread_runtime(config.threads.max(1)),
    };
    let parent_runtime = match parent_runtime {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Cannot create runtime: {}", err);
            return;
        }
    };

    let worker_handles = match config.runtime_type {
        RuntimeType::CurrentThread => start_current_thread_server(config, &ctxt),
        RuntimeType::MultiThread => {
            start_threadpool_server(config, &ctxt, &parent_runtime);
            Vec::new()
        }
    };

    let expiration_reaper = ctxt.expiration_reaper();
    parent_runtime.spawn(async move { expiration_reaper.run().await });

    let system_timer = ctxt.system_timer();
    parent_runtime.block_on(system_timer.run());

    for handle in worker_handles {
        if handle.join().is_err() {
            error!("Worker thread panicked");
        }
    }
    info!("Server stopped");
}
