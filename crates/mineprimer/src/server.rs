//! TCP accept loop, one task per connection.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span};

use crate::connection::{ServerInfo, serve};

/// Standby server answering status pings.
pub struct Server {
    /// Status fields shared by every connection
    info: ServerInfo,
    /// Time a connection may stay open
    timeout: Duration,
    /// Session counter for logging
    session_counter: AtomicUsize,
}

impl Server {
    /// Create a new server.
    #[must_use]
    pub const fn new(info: ServerInfo, timeout: Duration) -> Self {
        Self {
            info,
            timeout,
            session_counter: AtomicUsize::new(0),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self: Arc<Self>, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((client, client_addr)) => {
                    let server = Arc::clone(&self);
                    tokio::spawn(async move {
                        server.handle_connection(client, client_addr).await;
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {e}");
                }
            }
        }
    }

    /// Handle a single client connection. The stream is closed on return.
    async fn handle_connection(&self, mut client: TcpStream, client_addr: SocketAddr) {
        let session_id = self.session_counter.fetch_add(1, Ordering::SeqCst);
        let deadline = Instant::now() + self.timeout;

        async {
            info!("New connection");

            match serve(&mut client, deadline, &self.info).await {
                Ok(handshake) => {
                    info!(
                        protocol = handshake.protocol_version,
                        address = %handshake.server_address,
                        "Login requested but not served, closing"
                    );
                }
                Err(e) => {
                    debug!("Connection closed: {e}");
                }
            }
        }
        .instrument(info_span!(
            "conn",
            sid = session_id,
            ip = %client_addr.ip(),
            port = client_addr.port()
        ))
        .await;
    }
}
