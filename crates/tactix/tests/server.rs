//! End-to-end tests for the relay over real sockets.
//!
//! Each test starts a server on an ephemeral port, connects WebSocket
//! clients with `tokio-tungstenite`, and speaks the JSON event contract
//! exactly as a browser client would.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tactix::{ClientEvent, Mark, Outcome, RoomKey, ServerEvent, TactixServer};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on ephemeral ports and returns (game addr, health addr).
async fn start() -> (String, String) {
    let server = TactixServer::builder()
        .bind("127.0.0.1:0")
        .health_bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");
    let addr = server.local_addr().expect("game addr").to_string();
    let health = server.health_addr().expect("health addr").to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, health)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, event: &ClientEvent) {
    let text = serde_json::to_string(event).expect("encode");
    ws.send(Message::Text(text.into())).await.expect("send");
}

async fn recv(ws: &mut ClientWs) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("frame error");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("decode"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn join(ws: &mut ClientWs, room: &str) {
    send(ws, &ClientEvent::JoinRoom {
        room: RoomKey::from(room),
        name: None,
    })
    .await;
}

async fn make_move(ws: &mut ClientWs, room: &str, index: usize) {
    send(ws, &ClientEvent::MakeMove {
        room: RoomKey::from(room),
        index,
    })
    .await;
}

/// Two clients seated in `room`, join traffic drained.
async fn setup_game(addr: &str, room: &str) -> (ClientWs, ClientWs) {
    let mut p1 = connect(addr).await;
    let mut p2 = connect(addr).await;
    join(&mut p1, room).await;
    assert_eq!(recv(&mut p1).await, ServerEvent::AssignSymbol { mark: Mark::X });
    join(&mut p2, room).await;
    assert_eq!(recv(&mut p2).await, ServerEvent::AssignSymbol { mark: Mark::O });
    let _ = recv(&mut p1).await; // StartGame
    let _ = recv(&mut p2).await; // StartGame
    (p1, p2)
}

/// Sends a move and drains the update broadcast from both players.
/// Returns the event received by the mover.
async fn play(
    mover: &mut ClientWs,
    other: &mut ClientWs,
    room: &str,
    index: usize,
) -> ServerEvent {
    make_move(mover, room, index).await;
    let event = recv(mover).await;
    let _ = recv(other).await;
    event
}

// =========================================================================
// Join flow
// =========================================================================

#[tokio::test]
async fn test_join_assigns_marks_and_starts_game() {
    let (addr, _) = start().await;
    let mut p1 = connect(&addr).await;
    let mut p2 = connect(&addr).await;

    join(&mut p1, "r1").await;
    assert_eq!(recv(&mut p1).await, ServerEvent::AssignSymbol { mark: Mark::X });

    join(&mut p2, "r1").await;
    assert_eq!(recv(&mut p2).await, ServerEvent::AssignSymbol { mark: Mark::O });

    // Both players get the start notification: empty board, X to move.
    for ws in [&mut p1, &mut p2] {
        match recv(ws).await {
            ServerEvent::StartGame { board, turn, players } => {
                assert!(board.iter().all(Option::is_none));
                assert_eq!(turn, Mark::X);
                assert_eq!(players.len(), 2);
                assert_eq!(players[0].mark, Mark::X);
                assert_eq!(players[1].mark, Mark::O);
            }
            other => panic!("expected StartGame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_join_echoes_display_names() {
    let (addr, _) = start().await;
    let mut p1 = connect(&addr).await;
    let mut p2 = connect(&addr).await;

    send(&mut p1, &ClientEvent::JoinRoom {
        room: RoomKey::from("r1"),
        name: Some("ada".into()),
    })
    .await;
    let _ = recv(&mut p1).await; // AssignSymbol

    send(&mut p2, &ClientEvent::JoinRoom {
        room: RoomKey::from("r1"),
        name: Some("lin".into()),
    })
    .await;
    let _ = recv(&mut p2).await; // AssignSymbol

    match recv(&mut p1).await {
        ServerEvent::StartGame { players, .. } => {
            assert_eq!(players[0].name.as_deref(), Some("ada"));
            assert_eq!(players[1].name.as_deref(), Some("lin"));
        }
        other => panic!("expected StartGame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_third_join_is_rejected_without_breaking_the_game() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    let mut p3 = connect(&addr).await;
    join(&mut p3, "r1").await;
    assert_eq!(recv(&mut p3).await, ServerEvent::RoomFull);

    // The seated players are untouched: X opens and both see the update.
    let event = play(&mut p1, &mut p2, "r1", 0).await;
    assert!(matches!(event, ServerEvent::UpdateGame { .. }));
}

// =========================================================================
// Moves
// =========================================================================

#[tokio::test]
async fn test_move_broadcasts_updated_board_and_turn() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    make_move(&mut p1, "r1", 0).await;

    for ws in [&mut p1, &mut p2] {
        match recv(ws).await {
            ServerEvent::UpdateGame { board, turn, outcome } => {
                assert_eq!(board[0], Some(Mark::X));
                assert_eq!(turn, Mark::O);
                assert_eq!(outcome, None);
            }
            other => panic!("expected UpdateGame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_occupied_cell_is_silently_ignored() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    play(&mut p1, &mut p2, "r1", 0).await;

    // O tries the occupied cell — silently dropped, no broadcast. O then
    // plays a free cell; the very next event both players see is that
    // update, with cell 0 still holding X.
    make_move(&mut p2, "r1", 0).await;
    make_move(&mut p2, "r1", 4).await;
    match recv(&mut p1).await {
        ServerEvent::UpdateGame { board, turn, .. } => {
            assert_eq!(board[0], Some(Mark::X));
            assert_eq!(board[4], Some(Mark::O));
            assert_eq!(turn, Mark::X);
        }
        other => panic!("expected UpdateGame, got {other:?}"),
    }
    let _ = recv(&mut p2).await;
}

#[tokio::test]
async fn test_wrong_turn_is_silently_ignored() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    // O tries to go first — silently dropped.
    make_move(&mut p2, "r1", 0).await;

    // X goes — succeeds, proving O's attempt left no trace.
    make_move(&mut p1, "r1", 0).await;
    match recv(&mut p2).await {
        ServerEvent::UpdateGame { board, .. } => {
            assert_eq!(board[0], Some(Mark::X));
        }
        other => panic!("expected UpdateGame, got {other:?}"),
    }
    let _ = recv(&mut p1).await;
}

// =========================================================================
// Full games
// =========================================================================

//  X | X | X
//  O | O | .
//  . | . | .
#[tokio::test]
async fn test_x_wins_top_row() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    play(&mut p1, &mut p2, "r1", 0).await;
    play(&mut p2, &mut p1, "r1", 3).await;
    play(&mut p1, &mut p2, "r1", 1).await;
    play(&mut p2, &mut p1, "r1", 4).await;

    // X plays 2 — winning move.
    make_move(&mut p1, "r1", 2).await;
    for ws in [&mut p1, &mut p2] {
        match recv(ws).await {
            ServerEvent::UpdateGame { outcome, .. } => {
                assert_eq!(outcome, Some(Outcome::Won { mark: Mark::X }));
            }
            other => panic!("expected UpdateGame, got {other:?}"),
        }
    }
}

//  X | O | X
//  X | O | X
//  O | X | O
#[tokio::test]
async fn test_draw_when_board_fills() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    play(&mut p1, &mut p2, "r1", 0).await;
    play(&mut p2, &mut p1, "r1", 1).await;
    play(&mut p1, &mut p2, "r1", 2).await;
    play(&mut p2, &mut p1, "r1", 4).await;
    play(&mut p1, &mut p2, "r1", 3).await;
    play(&mut p2, &mut p1, "r1", 6).await;
    play(&mut p1, &mut p2, "r1", 5).await;
    play(&mut p2, &mut p1, "r1", 8).await;

    // X fills the last cell — draw.
    make_move(&mut p1, "r1", 7).await;
    for ws in [&mut p1, &mut p2] {
        match recv(ws).await {
            ServerEvent::UpdateGame { outcome, .. } => {
                assert_eq!(outcome, Some(Outcome::Draw));
            }
            other => panic!("expected UpdateGame, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_restart_clears_the_board_and_keeps_marks() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    play(&mut p1, &mut p2, "r1", 0).await;
    play(&mut p2, &mut p1, "r1", 3).await;
    play(&mut p1, &mut p2, "r1", 1).await;
    play(&mut p2, &mut p1, "r1", 4).await;
    play(&mut p1, &mut p2, "r1", 2).await; // X wins

    send(&mut p2, &ClientEvent::RestartGame {
        room: RoomKey::from("r1"),
    })
    .await;
    for ws in [&mut p1, &mut p2] {
        match recv(ws).await {
            ServerEvent::StartGame { board, turn, .. } => {
                assert!(board.iter().all(Option::is_none));
                assert_eq!(turn, Mark::X);
            }
            other => panic!("expected StartGame, got {other:?}"),
        }
    }

    // Marks survived the reset: X still opens.
    let event = play(&mut p1, &mut p2, "r1", 8).await;
    match event {
        ServerEvent::UpdateGame { board, .. } => assert_eq!(board[8], Some(Mark::X)),
        other => panic!("expected UpdateGame, got {other:?}"),
    }
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_survivor_is_told_the_opponent_left() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    p2.close(None).await.expect("close");

    assert_eq!(recv(&mut p1).await, ServerEvent::OpponentLeft);
}

#[tokio::test]
async fn test_freed_seat_goes_to_the_next_joiner() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    p2.close(None).await.expect("close");
    assert_eq!(recv(&mut p1).await, ServerEvent::OpponentLeft);

    let mut p3 = connect(&addr).await;
    join(&mut p3, "r1").await;
    assert_eq!(recv(&mut p3).await, ServerEvent::AssignSymbol { mark: Mark::O });
    assert!(matches!(recv(&mut p3).await, ServerEvent::StartGame { .. }));
    assert!(matches!(recv(&mut p1).await, ServerEvent::StartGame { .. }));
}

#[tokio::test]
async fn test_emptied_room_is_recreated_fresh() {
    let (addr, _) = start().await;
    let (mut p1, mut p2) = setup_game(&addr, "r1").await;

    // Put a mark down so a stale room would be distinguishable.
    play(&mut p1, &mut p2, "r1", 0).await;

    p1.close(None).await.expect("close p1");
    let _ = recv(&mut p2).await; // OpponentLeft
    p2.close(None).await.expect("close p2");
    // The last disconnect has no survivors to signal, so give the relay
    // a moment to finish tearing the room down.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The key now maps to a brand-new room: first joiner is X again and
    // the board starts empty.
    let mut p3 = connect(&addr).await;
    let mut p4 = connect(&addr).await;
    join(&mut p3, "r1").await;
    assert_eq!(recv(&mut p3).await, ServerEvent::AssignSymbol { mark: Mark::X });
    join(&mut p4, "r1").await;
    let _ = recv(&mut p4).await; // AssignSymbol
    match recv(&mut p3).await {
        ServerEvent::StartGame { board, turn, .. } => {
            assert!(board.iter().all(Option::is_none));
            assert_eq!(turn, Mark::X);
        }
        other => panic!("expected StartGame, got {other:?}"),
    }
}

// =========================================================================
// Robustness
// =========================================================================

#[tokio::test]
async fn test_malformed_frames_do_not_kill_the_connection() {
    let (addr, _) = start().await;
    let mut p1 = connect(&addr).await;

    p1.send(Message::Text("not json at all".into()))
        .await
        .expect("send garbage");
    p1.send(Message::Text(r#"{"event":"flyToMoon"}"#.into()))
        .await
        .expect("send unknown event");

    // The connection is still alive and can join normally.
    join(&mut p1, "r1").await;
    assert_eq!(recv(&mut p1).await, ServerEvent::AssignSymbol { mark: Mark::X });
}

#[tokio::test]
async fn test_move_without_joining_is_ignored() {
    let (addr, _) = start().await;
    let mut p1 = connect(&addr).await;

    make_move(&mut p1, "r1", 0).await;

    // No update arrives; the next observable event is the join reply.
    join(&mut p1, "r1").await;
    assert_eq!(recv(&mut p1).await, ServerEvent::AssignSymbol { mark: Mark::X });
}

// =========================================================================
// Liveness endpoint
// =========================================================================

#[tokio::test]
async fn test_health_endpoint_answers_plain_text() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let (_, health) = start().await;

    let mut stream = tokio::net::TcpStream::connect(&health)
        .await
        .expect("connect health");
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");

    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.contains("tactix relay is running"));
}
