use std::net::TcpStream;
use std::process;
use std::time::{Duration, Instant};

use memcachr::{
    memcache,
    memcache_server::{
        runtime_builder::start_memcachr_server_with_ctxt, server_context::ServerContext,
    },
};
use tokio_util::sync::CancellationToken;

use crate::common::{random_port::pseudoRandomPort, MemcachrdServerParamsBuilder};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct MemcachrdMultiThreadTestServer {
    thread_join_handle: Option<std::thread::JoinHandle<()>>,
    cancellation_token: CancellationToken,
    port: u16,
}

#[allow(dead_code)]
impl MemcachrdMultiThreadTestServer {
    fn new(
        thread_join_handle: std::thread::JoinHandle<()>,
        cancellation_token: CancellationToken,
        port: u16,
    ) -> MemcachrdMultiThreadTestServer {
        MemcachrdMultiThreadTestServer {
            thread_join_handle: Some(thread_join_handle),
            cancellation_token,
            port,
        }
    }

    fn kill(&mut self) {
        self.cancellation_token.cancel();
        if let Some(thread_join_handle) = self.thread_join_handle.take() {
            if thread_join_handle.join().is_err() {
                eprintln!("Server thread panicked");
            }
        }
    }

    fn wait_until_ready(&self) {
        let started = Instant::now();
        while TcpStream::connect(("127.0.0.1", self.port)).is_err() {
            if started.elapsed() > STARTUP_TIMEOUT {
                panic!("Server on port {} did not start", self.port);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_connection_string(&self) -> String {
        format!(
            "memcache://127.0.0.1:{}?timeout=5&tcp_nodelay=true&protocol=ascii",
            self.port
        )
    }
}

impl Drop for MemcachrdMultiThreadTestServer {
    fn drop(&mut self) {
        self.kill();
    }
}

fn spawn_server_args(args: Vec<String>) -> MemcachrdMultiThreadTestServer {
    let config = match memcache::cli::parser::parse(args) {
        Ok(config) => config,
        Err(err) => {
            eprint!("{}", err);
            process::exit(1);
        }
    };
    let store_config = memcache::builder::MemcacheStoreConfig::new(config.store_engine);
    let ctxt = ServerContext::new(
        store_config,
        Duration::from_millis(config.reaper_interval_ms),
        config.connection_limit,
    );
    let cancellation_token = ctxt.cancellation_token();
    let port = config.port;
    let handle = std::thread::spawn(move || start_memcachr_server_with_ctxt(config, ctxt));
    let server = MemcachrdMultiThreadTestServer::new(handle, cancellation_token, port);
    server.wait_until_ready();
    server
}

pub fn spawn_server(mut params: MemcachrdServerParamsBuilder) -> MemcachrdMultiThreadTestServer {
    let port = pseudoRandomPort.lock().unwrap().get_next_port();
    params.with_port(port);
    let args = params.build();
    spawn_server_args(args)
}
