use crate::memcache;
use crate::memcache_server::{
    runtime_builder::start_memcachr_server_with_ctxt, server_context::ServerContext,
};
use log::info;
use std::process;
use std::time::Duration;
use tracing_log::LogTracer;
extern crate clap;

#[cfg(feature = "jemallocator")]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn get_log_level(verbose: u8) -> tracing::Level {
    // Vary the output based on how many times the user used the "verbose" flag
    // (i.e. 'myprog -v -v -v' or 'myprog -vvv' vs 'myprog -v'
    match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

pub fn run(args: Vec<String>) {
    if let Err(err) = LogTracer::init() {
        eprintln!("Cannot initialize logger: {}", err);
        process::exit(1);
    }

    let cli_config = match memcache::cli::parser::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(get_log_level(cli_config.verbose))
        .init();

    info!("Listen address: {}", cli_config.listen);
    info!("Listen port: {}", cli_config.port);
    info!("Connection limit: {}", cli_config.connection_limit);
    info!("Number of threads: {}", cli_config.threads);
    info!("Store engine: {}", cli_config.store_engine.as_str());
    info!("Runtime type: {}", cli_config.runtime_type.as_str());
    info!(
        "Max item size: {}",
        byte_unit::Byte::from_u64(cli_config.max_item_size)
            .get_appropriate_unit(byte_unit::UnitType::Decimal)
    );
    info!("Reaper interval: {}ms", cli_config.reaper_interval_ms);
    info!("Idle timeout: {}s", cli_config.idle_timeout);

    let store_config = memcache::builder::MemcacheStoreConfig::new(cli_config.store_engine);
    let ctxt = ServerContext::new(
        store_config,
        Duration::from_millis(cli_config.reaper_interval_ms),
        cli_config.connection_limit,
    );

    let cancellation_token = ctxt.cancellation_token();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("Cannot create signal runtime: {}", err);
                return;
            }
        };
        runtime.block_on(async {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => info!("Shutdown signal received"),
                        Err(err) => error!("Cannot listen for shutdown signal: {}", err),
                    }
                    cancellation_token.cancel();
                }
                _ = cancellation_token.cancelled() => {}
            }
        });
    });

    start_memcachr_server_with_ctxt(cli_config, ctxt);
}
