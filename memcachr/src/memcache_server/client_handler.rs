use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::handler;
use crate::memcache::store as storage;
use crate::protocol::text::connection::MemcacheTextConnection;
use crate::protocol::text::decoder::TextRequest;

pub struct ClientConfig {
    pub(crate) item_memory_limit: u32,
    pub(crate) rx_timeout_secs: u32,
}

pub struct Client {
    stream: MemcacheTextConnection,
    addr: SocketAddr,
    config: ClientConfig,
    handler: handler::TextHandler,
    /// Max connection semaphore.
    ///
    /// When the client is dropped, a permit is returned to this semaphore. If
    /// the listener is waiting for connections to close, it will be notified of
    /// the newly available permit and resume accepting connections.
    limit_connections: Arc<Semaphore>,
    cancellation_token: CancellationToken,
}

impl Client {
    pub fn new(
        store: Arc<storage::MemcStore>,
        socket: TcpStream,
        addr: SocketAddr,
        config: ClientConfig,
        limit_connections: Arc<Semaphore>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Client {
            stream: MemcacheTextConnection::new(socket, config.item_memory_limit),
            addr,
            config,
            handler: handler::TextHandler::new(store),
            limit_connections,
            cancellation_token,
        }
    }

    pub async fn handle(&mut self) {
        debug!("New client connected: {}", self.addr);

        // Requests are answered strictly in order, one at a time,
        // so replies of pipelined requests keep their order.
        loop {
            let frame = tokio::select! {
                frame = timeout(
                    Duration::from_secs(self.config.rx_timeout_secs as u64),
                    self.stream.read_frame(),
                ) => frame,
                _ = self.cancellation_token.cancelled() => {
                    debug!("Server shutdown, disconnecting client: {}", self.addr);
                    return;
                }
            };

            match frame {
                Ok(req_or_none) => {
                    let client_close = self.handle_frame(req_or_none).await;
                    if client_close {
                        return;
                    }
                }
                Err(err) => {
                    debug!(
                        "Timeout {}s elapsed, disconnecting client: {}, error: {}",
                        self.config.rx_timeout_secs, self.addr, err
                    );
                    return;
                }
            }
        }
    }

    async fn handle_frame(&mut self, req: Result<Option<TextRequest>, io::Error>) -> bool {
        match req {
            Ok(Some(request)) => self.handle_request(request).await,
            Ok(None) => {
                debug!("Connection closed: {}", self.addr);
                true
            }
            Err(err) => {
                log_error(err);
                true
            }
        }
    }

    /// Handles single memcached text request
    /// Returns true if we should leave client receive loop
    async fn handle_request(&mut self, request: TextRequest) -> bool {
        debug!("Got request {:?}", request);

        if let TextRequest::Quit = request {
            debug!("Closing client socket quit command");
            if let Err(_e) = self.stream.shutdown().await.map_err(log_error) {}
            return true;
        }

        match self.handler.handle_request(request) {
            Some(response) => {
                debug!("Sending response {:?}", response);
                if let Err(e) = self.stream.write(&response).await {
                    error!("error on sending response; error = {:?}", e);
                    return true;
                }
                false
            }
            None => false,
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // Add a permit back to the semaphore.
        //
        // Doing so unblocks the listener if the max number of
        // connections has been reached. Drop runs even if the task
        // handling the connection panics.
        self.limit_connections.add_permits(1);
    }
}

fn log_error(e: io::Error) {
    // client may just drop connection in the middle of a request
    match e.kind() {
        io::ErrorKind::NotConnected | io::ErrorKind::ConnectionReset => {
            info!("Error: {}", e);
        }
        _ => {
            error!("Error: {}", e);
        }
    }
}
