//! Unified error type for the relay server.

use tactix_transport::TransportError;

/// Top-level error for server construction and the accept loop.
///
/// Bad client input never surfaces here: invalid events are absorbed at
/// the room layer and undecodable frames are skipped in the handler, per
/// the relay's non-fatal error posture. What remains is startup I/O and
/// transport failure. The `#[from]` attributes let `?` convert
/// layer-specific errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TactixError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An I/O error outside the WebSocket transport (liveness listener).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::AcceptFailed(std::io::Error::other("boom"));
        let top: TactixError = err.into();
        assert!(matches!(top, TactixError::Transport(_)));
        assert!(top.to_string().contains("boom"));
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::other("no port");
        let top: TactixError = err.into();
        assert!(matches!(top, TactixError::Io(_)));
    }
}
