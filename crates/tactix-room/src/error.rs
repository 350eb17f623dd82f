//! Error types for the room layer.
//!
//! Nothing here is fatal. A [`JoinRejection::Full`] becomes a `roomFull`
//! event to the requester; everything else is logged at `debug` and
//! absorbed, per the relay's silent-no-op posture.

use tactix_protocol::RoomKey;

/// Why a join attempt did not take a seat.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinRejection {
    /// Both seats are already bound to other connections.
    #[error("room is full")]
    Full,

    /// The connection already holds a seat in this room.
    #[error("connection already holds a seat in this room")]
    AlreadySeated,
}

/// Why a move was absorbed without effect.
///
/// Clients never see these; they infer rejection from the absence of an
/// update. The variants exist so the debug log names the reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    /// No room exists under this key.
    #[error("room {0} does not exist")]
    UnknownRoom(RoomKey),

    /// The game already reached a terminal state; reset first.
    #[error("game is already over")]
    Finished,

    /// The issuing connection holds no seat in the room.
    #[error("connection holds no seat in this room")]
    NotSeated,

    /// The issuing connection's mark is not the current turn mark.
    #[error("not this player's turn")]
    NotYourTurn,

    /// The cell index is outside 0..9.
    #[error("cell index {0} is out of bounds")]
    OutOfBounds(usize),

    /// The cell is already occupied.
    #[error("cell {0} is already occupied")]
    Occupied(usize),
}
