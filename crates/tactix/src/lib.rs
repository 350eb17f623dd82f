//! # Tactix
//!
//! A minimal real-time relay server that pairs two WebSocket clients into
//! a shared tic-tac-toe session: admit players into a room, assign marks,
//! validate and apply moves, detect wins and draws, and propagate state
//! to both participants, including cleanup on abrupt disconnection.
//!
//! Single process, in-memory only. No persistence, no authentication, no
//! matchmaking beyond the client-supplied room key, no reconnection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tactix::TactixServer;
//!
//! # async fn run() -> Result<(), tactix::TactixError> {
//! let server = TactixServer::builder()
//!     .bind("0.0.0.0:4000")
//!     .health_bind("0.0.0.0:4001")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod health;
mod server;

pub use config::ServerConfig;
pub use error::TactixError;
pub use server::{TactixServer, TactixServerBuilder};

// Re-export the wire and room vocabulary so embedders and tests work
// against one crate.
pub use tactix_protocol::{
    BoardCells, ClientEvent, Mark, Outcome, RoomKey, SeatInfo, ServerEvent,
};
pub use tactix_room::RoomRegistry;
