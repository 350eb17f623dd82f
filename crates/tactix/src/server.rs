//! `TactixServer` builder and accept loop.
//!
//! The entry point for running the relay. It ties the layers together:
//! transport → protocol → room registry, plus the liveness listener.

use std::sync::Arc;

use tactix_protocol::JsonCodec;
use tactix_room::RoomRegistry;
use tactix_transport::WsListener;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::handler::handle_connection;
use crate::{TactixError, health};

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry sits behind a single `Mutex`: every inbound event is handled
/// to completion under the lock, which serializes all room mutation and
/// makes per-room locking unnecessary. The lock is never held across
/// socket I/O — broadcasts go through the registry's fire-and-forget
/// channels.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a relay server.
///
/// # Example
///
/// ```rust,no_run
/// use tactix::TactixServer;
///
/// # async fn run() -> Result<(), tactix::TactixError> {
/// let server = TactixServer::builder()
///     .bind("0.0.0.0:4000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct TactixServerBuilder {
    config: ServerConfig,
}

impl TactixServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces the whole configuration (e.g. one read from the
    /// environment).
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address of the WebSocket game listener.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the address of the liveness listener.
    pub fn health_bind(mut self, addr: &str) -> Self {
        self.config.health_addr = addr.to_string();
        self
    }

    /// Binds both listeners and builds the server.
    pub async fn build(self) -> Result<TactixServer, TactixError> {
        let listener = WsListener::bind(&self.config.bind_addr).await?;
        let health_listener = TcpListener::bind(&self.config.health_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
        });

        Ok(TactixServer {
            listener,
            health_listener,
            state,
        })
    }
}

impl Default for TactixServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct TactixServer {
    listener: WsListener,
    health_listener: TcpListener,
    state: Arc<ServerState>,
}

impl TactixServer {
    /// Creates a new builder.
    pub fn builder() -> TactixServerBuilder {
        TactixServerBuilder::new()
    }

    /// Returns the local address of the game listener.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns the local address of the liveness listener.
    pub fn health_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.health_listener.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns the liveness endpoint, then accepts incoming connections
    /// and hands each one its own handler task. Runs until the process
    /// is terminated.
    pub async fn run(self) -> Result<(), TactixError> {
        tracing::info!("tactix relay running");

        tokio::spawn(health::serve(self.health_listener));

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
