use socket2::{Domain, SockAddr, Socket, Type};
use std::net::ToSocketAddrs;
use std::sync::Arc;

use tokio::io;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use tracing::{debug, error, warn};

use super::client_handler;
use crate::cache::cache::Cache;
use crate::memcache::store as storage;

#[derive(Clone, Copy, Debug)]
pub struct MemcacheServerConfig {
    timeout_secs: u32,
    item_memory_limit: u32,
    listen_backlog: u32,
}

impl MemcacheServerConfig {
    pub fn new(
        timeout_secs: u32,
        item_memory_limit: u32,
        listen_backlog: u32,
    ) -> Self {
        MemcacheServerConfig {
            timeout_secs,
            item_memory_limit,
            listen_backlog,
        }
    }
}

#[derive(Clone)]
pub struct MemcacheTcpServer {
    storage: Arc<storage::MemcStore>,
    limit_connections: Arc<Semaphore>,
    config: MemcacheServerConfig,
    cancellation_token: CancellationToken,
}

impl MemcacheTcpServer {
    pub fn new(
        config: MemcacheServerConfig,
        store: Arc<dyn Cache + Send + Sync>,
        limit_connections: Arc<Semaphore>,
        cancellation_token: CancellationToken,
    ) -> MemcacheTcpServer {
        MemcacheTcpServer {
            storage: Arc::new(storage::MemcStore::new(store)),
            limit_connections,
            config,
            cancellation_token,
        }
    }

    pub async fn run<A: ToSocketAddrs>(&mut self, addr: A) -> io::Result<()> {
        let listener = self.get_tcp_listener(addr)?;
        loop {
            let (socket, peer_addr) = tokio::select! {
                connection = listener.accept() => {
                    match connection {
                        Ok(connection) => connection,
                        Err(err) => {
                            error!("Accept error: {}", err);
                            continue;
                        }
                    }
                }
                _ = self.cancellation_token.cancelled() => {
                    debug!("Listener shutdown");
                    return Ok(());
                }
            };

            // Accepted connection waits for a slot shared by all listeners.
            let permit = tokio::select! {
                permit = self.limit_connections.acquire() => permit,
                _ = self.cancellation_token.cancelled() => {
                    debug!("Listener shutdown");
                    return Ok(());
                }
            };
            match permit {
                Ok(permit) => permit.forget(),
                Err(err) => {
                    error!("Connection limit semaphore closed: {}", err);
                    return Ok(());
                }
            }

            if let Err(err) = socket.set_nodelay(true) {
                warn!("Cannot set TCP_NODELAY for {}: {}", peer_addr, err);
            }
            let mut client = client_handler::Client::new(
                Arc::clone(&self.storage),
                socket,
                peer_addr,
                self.get_client_config(),
                Arc::clone(&self.limit_connections),
                self.cancellation_token.child_token(),
            );
            // Every client runs on its own task, a slow
            // client does not stall the others.
            tokio::spawn(async move { client.handle().await });
        }
    }

    fn get_tcp_listener<A: ToSocketAddrs>(
        &mut self,
        addr: A,
    ) -> Result<TcpListener, std::io::Error> {
        let mut addrs_iter = addr.to_socket_addrs()?;
        let socket_addr = match addrs_iter.next() {
            Some(socket_addr) => socket_addr,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "no address to bind to",
                ))
            }
        };
        let socket = Socket::new(Domain::for_address(socket_addr), Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        socket.set_reuse_port(true)?;
        socket.set_nonblocking(true)?;

        debug!("Binding to addr: {:?}", socket_addr);
        let sock_addr = SockAddr::from(socket_addr);
        if let Err(err) = socket.bind(&sock_addr) {
            error!("Can't bind to: {:?}, err {:?}", socket_addr, err);
            return Err(err);
        }

        if let Err(err) = socket.listen(self.config.listen_backlog as i32) {
            error!("Listen error: {:?}", err);
            return Err(err);
        }

        let std_listener: std::net::TcpListener = socket.into();
        TcpListener::from_std(std_listener)
    }

    fn get_client_config(&self) -> client_handler::ClientConfig {
        client_handler::ClientConfig {
            item_memory_limit: self.config.item_memory_limit,
            rx_timeout_secs: self.config.timeout_secs,
        }
    }
}
