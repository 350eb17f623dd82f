//! Transport layer for the Tactix relay.
//!
//! This crate owns the network edge: accepting WebSocket connections and
//! moving text frames in both directions. It knows nothing about rooms,
//! marks, or turns — to the layers above, a connection is just "named
//! events arrive here" and "events can be written back."
//!
//! # Key types
//!
//! - [`ConnectionId`] — the process-unique identity of a connection. This
//!   is the identity that room seats bind to; there is no separate player
//!   account concept.
//! - [`WsListener`] — binds a TCP port and accepts WebSocket upgrades.
//! - [`WsConnection`] — an accepted connection, split into independent
//!   halves ([`WsSender`], [`WsReceiver`]) so a writer task can deliver
//!   room broadcasts while the read loop is parked on the socket.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WsConnection, WsListener, WsReceiver, WsSender};

use std::fmt;

/// Opaque identifier for a connection.
///
/// Assigned from a process-wide counter at accept time. Because the relay
/// has no authentication, this is also the player identity a room seat
/// binds to: a connection that drops and reconnects is a new player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "first");
        map.insert(ConnectionId::new(2), "second");
        assert_eq!(map[&ConnectionId::new(1)], "first");
        assert_ne!(ConnectionId::new(1), ConnectionId::new(2));
    }
}
