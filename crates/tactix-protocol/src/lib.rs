//! Wire protocol for the Tactix relay.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Mark`], [`RoomKey`],
//!   [`Outcome`], etc.) — the named events that travel on the wire, plus
//!   [`Recipient`], the server-internal routing tag for outbound events.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to and from frame text.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (frames) and the room layer
//! (game state). It doesn't know about connections or rooms — it only
//! knows how to serialize and deserialize events.
//!
//! ```text
//! Transport (text frames) → Protocol (events) → Room (game state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    BoardCells, ClientEvent, Mark, Outcome, Recipient, RoomKey, SeatInfo, ServerEvent,
};
