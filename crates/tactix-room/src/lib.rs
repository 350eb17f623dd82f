//! Room lifecycle management for the Tactix relay.
//!
//! This is the core of the system: one bounded state machine over one
//! shared in-memory table. The [`RoomRegistry`] owns every room, admits
//! players into seats, validates and applies moves, detects terminal
//! boards, and fans resulting events out to the connections in each room.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — the lifecycle-scoped service object owning the
//!   room table and per-connection membership
//! - [`Room`] — one two-player session: board, turn, seat bindings
//! - [`Board`] — the 9-cell grid with win/draw detection
//! - [`RoomPhase`] — a room's observable lifecycle state
//! - [`MoveRejection`] — why an invalid move was absorbed (logged, never
//!   sent to the client)

mod board;
mod error;
mod registry;
mod room;

pub use board::{Board, CELLS};
pub use error::{JoinRejection, MoveRejection};
pub use registry::{EventSender, RoomRegistry};
pub use room::{Room, RoomPhase, Seat};
