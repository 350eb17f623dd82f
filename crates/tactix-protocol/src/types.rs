//! Core protocol types for the relay's wire format.
//!
//! Every type here that carries `Serialize`/`Deserialize` travels on the
//! wire as JSON. The event enums are internally tagged: each frame is an
//! object whose `"event"` field names the event, with the payload fields
//! flattened beside it — `{"event": "joinRoom", "room": "r1"}`. That
//! shape is what a browser client reads naturally from a text frame.

use serde::{Deserialize, Serialize};
use std::fmt;

use tactix_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// One of the two exclusive symbols a player is bound to for the duration
/// of a room's active game.
///
/// Serializes as the bare string `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark that opens every game. Reset always hands the turn back
    /// to this mark.
    pub const STARTING: Mark = Mark::X;

    /// Returns the opposing mark.
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// A caller-supplied room identifier, unique within the process.
///
/// Newtype over `String` so a room key can't be confused with any other
/// string floating through the server. `#[serde(transparent)]` keeps the
/// wire shape a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(pub String);

impl From<&str> for RoomKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The wire shape of a board: 9 cells, row-major on a 3x3 grid, each
/// empty (`null`) or holding a mark.
pub type BoardCells = [Option<Mark>; 9];

// ---------------------------------------------------------------------------
// Recipient — who should receive an outbound event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// Room operations return a list of `(Recipient, ServerEvent)` pairs; the
/// registry resolves each recipient against its connection table and
/// delivers. This never travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Send to one specific connection (e.g. a symbol assignment, or a
    /// rejection only the requester should see).
    Connection(ConnectionId),

    /// Send to every connection seated in the room.
    Room(RoomKey),
}

// ---------------------------------------------------------------------------
// Game outcome
// ---------------------------------------------------------------------------

/// The terminal result of a game, reported with the final board update.
///
/// Tagged on `"result"` so the wire shape is an explicit sum —
/// `{"result": "won", "mark": "X"}` or `{"result": "draw"}` — rather than
/// a stringly field that overloads `"draw"` onto the mark type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum Outcome {
    /// A mark completed a winning triple.
    Won { mark: Mark },

    /// The board filled with no winning triple.
    Draw,
}

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// A seated player as reported in `startGame`: the mark they hold and
/// the display name they joined with, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    pub mark: Mark,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// ClientEvent — what clients send
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// Disconnection is not an event — the server reacts to the transport
/// session ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// "Seat me in this room." The first joiner receives `X`, the second
    /// `O`; a third is rejected with `roomFull`. `name` is an optional
    /// display name echoed back in `startGame`.
    JoinRoom {
        room: RoomKey,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },

    /// "Place my mark at this cell." `index` is 0-8, row-major. Invalid
    /// moves (wrong turn, occupied cell, finished game, unknown room) are
    /// absorbed silently — the client infers rejection from the absence
    /// of an update.
    MakeMove { room: RoomKey, index: usize },

    /// "Start this room's game over." Clears the board, hands the turn
    /// back to `X`, keeps the seat bindings.
    RestartGame { room: RoomKey },
}

// ---------------------------------------------------------------------------
// ServerEvent — what the server sends
// ---------------------------------------------------------------------------

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// To the joiner: the mark their connection is now bound to.
    AssignSymbol { mark: Mark },

    /// To a rejected joiner: the room already seats two players.
    RoomFull,

    /// To the room when its second seat fills, and again on restart:
    /// the board, the mark that moves next, and the seated players.
    StartGame {
        board: BoardCells,
        turn: Mark,
        players: Vec<SeatInfo>,
    },

    /// To the room after every applied move. `outcome` is present exactly
    /// when this move ended the game.
    UpdateGame {
        board: BoardCells,
        turn: Mark,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outcome: Option<Outcome>,
    },

    /// To the remaining players when a seated opponent disconnects.
    OpponentLeft,
}

// =========================================================================
// Tests
// =========================================================================
