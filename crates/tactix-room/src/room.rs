//! A single two-player session: board, turn, and seat bindings.

use std::fmt;

use tactix_protocol::{BoardCells, Mark, Outcome, SeatInfo};
use tactix_transport::ConnectionId;

use crate::board::{Board, CELLS};
use crate::error::{JoinRejection, MoveRejection};

/// The marks the two seats hold, indexed by arrival order: the first
/// joiner takes seat 0 and plays `X`, the second takes seat 1 and plays
/// `O`.
const SEAT_MARKS: [Mark; 2] = [Mark::X, Mark::O];

/// A connection bound to a mark, with the display name it joined under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub conn: ConnectionId,
    pub name: Option<String>,
}

/// The observable lifecycle state of a room.
///
/// ```text
/// Waiting (1 seat) → Active (2 seats) → Finished → Active (via reset)
/// ```
///
/// Disconnection from any state frees a seat and may drop the room back
/// to `Waiting`, or delete it entirely when the last seat empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// Fewer than two seats are bound; the room waits indefinitely for
    /// an opponent.
    Waiting,

    /// Both seats are bound and the game is in progress.
    Active,

    /// The board has a winning triple or is full. No further moves are
    /// accepted until reset.
    Finished,
}

impl RoomPhase {
    /// Returns `true` if the room still has a free seat.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if the game is accepting moves with both players
    /// present.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// One isolated game session keyed by a caller-supplied identifier.
///
/// Invariants:
/// - at most 2 seats, each bound to a distinct mark;
/// - exactly one mark is current at any non-terminal moment;
/// - `game_over` is true iff the last applied move produced a line match
///   or filled the board.
#[derive(Debug, Clone)]
pub struct Room {
    board: Board,
    turn: Mark,
    /// The two-slot assignment table, indexed by arrival order.
    seats: [Option<Seat>; 2],
    game_over: bool,
}

impl Room {
    /// Creates an empty room: blank board, `X` to move, no seats bound.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Mark::STARTING,
            seats: [None, None],
            game_over: false,
        }
    }

    // -- Seats --

    /// Binds `conn` to the first free seat and returns the mark it holds.
    pub fn take_seat(
        &mut self,
        conn: ConnectionId,
        name: Option<String>,
    ) -> Result<Mark, JoinRejection> {
        if self.mark_of(conn).is_some() {
            return Err(JoinRejection::AlreadySeated);
        }
        let slot = self
            .seats
            .iter()
            .position(Option::is_none)
            .ok_or(JoinRejection::Full)?;
        self.seats[slot] = Some(Seat { conn, name });
        Ok(SEAT_MARKS[slot])
    }

    /// Frees the seat bound to `conn`. Returns `true` if it held one.
    pub fn vacate(&mut self, conn: ConnectionId) -> bool {
        for seat in self.seats.iter_mut() {
            if seat.as_ref().is_some_and(|s| s.conn == conn) {
                *seat = None;
                return true;
            }
        }
        false
    }

    /// Returns the mark bound to `conn`, if it is seated here.
    pub fn mark_of(&self, conn: ConnectionId) -> Option<Mark> {
        self.seats
            .iter()
            .position(|seat| seat.as_ref().is_some_and(|s| s.conn == conn))
            .map(|slot| SEAT_MARKS[slot])
    }

    /// Number of bound seats.
    pub fn player_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_some()).count()
    }

    /// Returns `true` if both seats are bound.
    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// Returns `true` if no seat is bound.
    pub fn is_empty(&self) -> bool {
        self.seats.iter().all(Option::is_none)
    }

    /// The connections currently seated, for broadcast fan-out.
    pub fn member_conns(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.seats
            .iter()
            .filter_map(|seat| seat.as_ref().map(|s| s.conn))
    }

    /// The seated players as reported in `startGame`.
    pub fn seat_infos(&self) -> Vec<SeatInfo> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(slot, seat)| {
                seat.as_ref().map(|s| SeatInfo {
                    mark: SEAT_MARKS[slot],
                    name: s.name.clone(),
                })
            })
            .collect()
    }

    // -- Game state --

    /// Checks every precondition for a move by `conn` at `index` and
    /// returns the mark that would be placed.
    ///
    /// Checked in order: finished game first, then seating, then turn,
    /// and finally the cell itself.
    pub fn validate_move(
        &self,
        conn: ConnectionId,
        index: usize,
    ) -> Result<Mark, MoveRejection> {
        if self.game_over {
            return Err(MoveRejection::Finished);
        }
        let mark = self.mark_of(conn).ok_or(MoveRejection::NotSeated)?;
        if mark != self.turn {
            return Err(MoveRejection::NotYourTurn);
        }
        if index >= CELLS {
            return Err(MoveRejection::OutOfBounds(index));
        }
        if self.board.cell(index).is_some() {
            return Err(MoveRejection::Occupied(index));
        }
        Ok(mark)
    }

    /// Writes `mark` at `index` (already validated), evaluates the board,
    /// and returns the terminal outcome if this move ended the game.
    ///
    /// On a terminal move `game_over` is set and the turn mark stays put;
    /// otherwise the turn flips to the other player.
    pub fn apply_move(&mut self, index: usize, mark: Mark) -> Option<Outcome> {
        self.board.place(index, mark);
        let outcome = self.board.verdict();
        if outcome.is_some() {
            self.game_over = true;
        } else {
            self.turn = self.turn.other();
        }
        outcome
    }

    /// Restores the initial game state without touching seat bindings:
    /// all-empty board, `X` to move, terminal flag cleared.
    pub fn reset(&mut self) {
        self.board.clear();
        self.turn = Mark::STARTING;
        self.game_over = false;
    }

    /// The current lifecycle phase, derived from seats and the terminal
    /// flag.
    pub fn phase(&self) -> RoomPhase {
        if self.game_over {
            RoomPhase::Finished
        } else if self.is_full() {
            RoomPhase::Active
        } else {
            RoomPhase::Waiting
        }
    }

    /// The cells for a wire payload.
    pub fn board_cells(&self) -> BoardCells {
        self.board.cells()
    }

    /// The mark that moves next.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Returns `true` if the last applied move ended the game.
    pub fn is_over(&self) -> bool {
        self.game_over
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
