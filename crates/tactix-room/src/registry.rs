//! The room registry: owns the room table and routes events.
//!
//! Constructed once per process, owning the rooms exclusively, and
//! injected into the connection handlers — there is no ambient global
//! table.
//!
//! Every inbound event is handled to completion here — read, validate,
//! mutate, enqueue broadcasts — before the next event for any room is
//! processed (the caller serializes access behind a mutex). Operations
//! return `(Recipient, ServerEvent)` pairs and `dispatch` resolves them
//! against the per-connection sender table, fire-and-forget.

use std::collections::{HashMap, HashSet};

use tactix_protocol::{ClientEvent, Recipient, RoomKey, ServerEvent};
use tactix_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::error::{JoinRejection, MoveRejection};
use crate::room::{Room, RoomPhase};

/// Channel sender for delivering outbound events to a connection's
/// writer task.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Per-connection link state: where to deliver events, and which rooms
/// the connection has joined.
///
/// The joined-key set is the explicit reverse index that lets disconnect
/// handling touch only the affected rooms instead of scanning the whole
/// table.
struct Link {
    sender: EventSender,
    joined: HashSet<RoomKey>,
}

/// Owns every active room and the connection links into them.
pub struct RoomRegistry {
    /// Active rooms, keyed by the caller-supplied identifier. Rooms are
    /// created lazily on first join and removed when their last seated
    /// player disconnects.
    rooms: HashMap<RoomKey, Room>,

    /// Connected clients, registered before any event is handled.
    links: HashMap<ConnectionId, Link>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            links: HashMap::new(),
        }
    }

    /// Registers a connection's outbound channel.
    ///
    /// Must be called before the connection's first event; events routed
    /// to an unregistered connection are dropped.
    pub fn connect(&mut self, conn: ConnectionId, sender: EventSender) {
        tracing::debug!(%conn, "connection registered");
        self.links.insert(conn, Link {
            sender,
            joined: HashSet::new(),
        });
    }

    /// Handles one inbound client event to completion and delivers the
    /// resulting events.
    pub fn handle_event(&mut self, conn: ConnectionId, event: ClientEvent) {
        let out = match event {
            ClientEvent::JoinRoom { room, name } => self.join(conn, room, name),
            ClientEvent::MakeMove { room, index } => self.make_move(conn, &room, index),
            ClientEvent::RestartGame { room } => self.reset(&room),
        };
        self.dispatch(out);
    }

    /// Tears down a departed connection: frees its seats, deletes rooms
    /// it leaves empty, notifies survivors, and drops its link.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        let out = self.remove_connection(conn);
        self.dispatch(out);
    }

    // -- Introspection --

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if a room exists under `key`.
    pub fn contains_room(&self, key: &RoomKey) -> bool {
        self.rooms.contains_key(key)
    }

    /// The lifecycle phase of the room under `key`, if it exists.
    pub fn room_phase(&self, key: &RoomKey) -> Option<RoomPhase> {
        self.rooms.get(key).map(Room::phase)
    }

    // -- Operations --

    /// Seats `conn` in the room under `key`, creating the room lazily.
    ///
    /// The requester learns its mark; when the second seat fills, the
    /// whole room gets the start notification carrying the current board
    /// (all-empty for a fresh room, the live state when a vacated seat
    /// refills mid-session).
    fn join(
        &mut self,
        conn: ConnectionId,
        key: RoomKey,
        name: Option<String>,
    ) -> Vec<(Recipient, ServerEvent)> {
        let room = self.rooms.entry(key.clone()).or_insert_with(|| {
            tracing::info!(room = %key, "room created");
            Room::new()
        });

        match room.take_seat(conn, name) {
            Ok(mark) => {
                tracing::info!(room = %key, %conn, %mark, "player seated");
                let mut out = vec![(
                    Recipient::Connection(conn),
                    ServerEvent::AssignSymbol { mark },
                )];
                if room.is_full() {
                    tracing::info!(room = %key, phase = %room.phase(), "game started");
                    out.push((
                        Recipient::Room(key.clone()),
                        ServerEvent::StartGame {
                            board: room.board_cells(),
                            turn: room.turn(),
                            players: room.seat_infos(),
                        },
                    ));
                }
                if let Some(link) = self.links.get_mut(&conn) {
                    link.joined.insert(key);
                }
                out
            }
            Err(JoinRejection::Full) => {
                tracing::debug!(room = %key, %conn, "join rejected, room full");
                vec![(Recipient::Connection(conn), ServerEvent::RoomFull)]
            }
            Err(JoinRejection::AlreadySeated) => {
                tracing::debug!(room = %key, %conn, "join ignored, already seated");
                Vec::new()
            }
        }
    }

    /// Applies a move, or absorbs it silently when any precondition
    /// fails. Callers infer rejection from the absence of an update.
    fn make_move(
        &mut self,
        conn: ConnectionId,
        key: &RoomKey,
        index: usize,
    ) -> Vec<(Recipient, ServerEvent)> {
        match self.try_move(conn, key, index) {
            Ok(out) => out,
            Err(rejection) => {
                tracing::debug!(room = %key, %conn, index, %rejection, "move ignored");
                Vec::new()
            }
        }
    }

    fn try_move(
        &mut self,
        conn: ConnectionId,
        key: &RoomKey,
        index: usize,
    ) -> Result<Vec<(Recipient, ServerEvent)>, MoveRejection> {
        let room = self
            .rooms
            .get_mut(key)
            .ok_or_else(|| MoveRejection::UnknownRoom(key.clone()))?;

        let mark = room.validate_move(conn, index)?;
        let outcome = room.apply_move(index, mark);
        if let Some(outcome) = outcome {
            tracing::info!(room = %key, ?outcome, "game finished");
        }

        Ok(vec![(
            Recipient::Room(key.clone()),
            ServerEvent::UpdateGame {
                board: room.board_cells(),
                turn: room.turn(),
                outcome,
            },
        )])
    }

    /// Starts the room's game over. Unknown keys are absorbed silently.
    fn reset(&mut self, key: &RoomKey) -> Vec<(Recipient, ServerEvent)> {
        let Some(room) = self.rooms.get_mut(key) else {
            tracing::debug!(room = %key, "reset ignored, unknown room");
            return Vec::new();
        };

        room.reset();
        tracing::info!(room = %key, "room reset");
        vec![(
            Recipient::Room(key.clone()),
            ServerEvent::StartGame {
                board: room.board_cells(),
                turn: room.turn(),
                players: room.seat_infos(),
            },
        )]
    }

    /// Cleanup policy: a room survives a partial disconnect (survivors
    /// are notified) and is deleted only when its last seat empties.
    fn remove_connection(&mut self, conn: ConnectionId) -> Vec<(Recipient, ServerEvent)> {
        let Some(link) = self.links.remove(&conn) else {
            return Vec::new();
        };
        tracing::debug!(%conn, "connection dropped");

        let mut out = Vec::new();
        for key in link.joined {
            let now_empty = match self.rooms.get_mut(&key) {
                Some(room) => {
                    if !room.vacate(conn) {
                        continue;
                    }
                    room.is_empty()
                }
                None => continue,
            };

            if now_empty {
                self.rooms.remove(&key);
                tracing::info!(room = %key, "room destroyed, last player left");
            } else {
                tracing::info!(room = %key, %conn, "player left, notifying survivors");
                out.push((Recipient::Room(key), ServerEvent::OpponentLeft));
            }
        }
        out
    }

    // -- Delivery --

    /// Delivers outbound events to their recipients.
    fn dispatch(&self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::Connection(conn) => self.send_to(conn, event),
                Recipient::Room(key) => {
                    let Some(room) = self.rooms.get(&key) else {
                        continue;
                    };
                    for conn in room.member_conns() {
                        self.send_to(conn, event.clone());
                    }
                }
            }
        }
    }

    /// Sends an event to a single connection. Silently drops if the
    /// receiver is gone (connection already tearing down).
    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(link) = self.links.get(&conn) {
            let _ = link.sender.send(event);
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
