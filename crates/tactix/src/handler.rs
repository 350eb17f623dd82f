//! Per-connection handler: event decoding, routing, and teardown.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register the connection's outbound channel with the registry
//!   2. Spawn a writer task draining that channel onto the socket
//!   3. Loop: receive frames → decode events → hand to the registry
//!   4. On close or error, the drop guard tears the connection down
//!
//! There is no handshake or authentication phase: the transport-assigned
//! `ConnectionId` IS the player identity, bound to a mark at join time.

use std::sync::Arc;

use tactix_protocol::{ClientEvent, Codec};
use tactix_transport::{ConnectionId, WsConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;

/// Drop guard that cleans up a connection's room state when the handler
/// exits, however it exits. Since `Drop` is synchronous, it spawns a
/// fire-and-forget task for the async registry lock.
struct DisconnectGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.rooms.lock().await.disconnect(conn_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(conn: WsConnection, state: Arc<ServerState>) {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (mut sink, mut stream) = conn.split();

    // Register the outbound channel before any event can be handled, so
    // the connection is addressable from its very first join.
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.rooms.lock().await.connect(conn_id, tx);

    let _guard = DisconnectGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    // Writer task: everything the registry addresses to this connection
    // (direct replies and room broadcasts) flows through here.
    let codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match codec.encode(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode outbound event");
                    continue;
                }
            };
            if sink.send_text(text).await.is_err() {
                // Peer is gone; the read loop will notice and exit too.
                break;
            }
        }
    });

    // Read loop: decode and route until the connection ends.
    loop {
        match stream.recv().await {
            Ok(Some(text)) => {
                let event: ClientEvent = match state.codec.decode(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "ignoring undecodable frame");
                        continue;
                    }
                };
                state.rooms.lock().await.handle_event(conn_id, event);
            }
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "connection lost");
                break;
            }
        }
    }

    writer.abort();
    // _guard drops here → room cleanup fires.
}
