//! Codec trait and implementations for serializing/deserializing events.
//!
//! A codec converts between Rust types and frame text. The protocol layer
//! doesn't care HOW events are serialized — it just needs something that
//! implements the [`Codec`] trait, so a different format could be swapped
//! in without touching the handler or room layers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to frame text and decodes frame text back.
///
/// `Send + Sync + 'static` because the codec is shared across connection
/// handler tasks for the life of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into frame text.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes frame text back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the text is malformed or does
    /// not match the expected event shape.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON text frames are what browser clients produce and consume
/// directly, and they stay readable in DevTools while debugging a game.
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use tactix_protocol::{ClientEvent, Codec, JsonCodec, RoomKey};
///
/// let codec = JsonCodec;
///
/// let event = ClientEvent::MakeMove {
///     room: RoomKey::from("r1"),
///     index: 4,
/// };
///
/// let text = codec.encode(&event).unwrap();
/// let decoded: ClientEvent = codec.decode(&text).unwrap();
/// assert_eq!(event, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
