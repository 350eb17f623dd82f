//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in serialization or
//! deserialization, not in networking or room state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into frame text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning frame text into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown event name, missing
    /// required fields, or wrong field types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
