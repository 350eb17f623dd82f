//! Integration tests for the WebSocket transport against real sockets.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tactix_transport::WsListener;
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn bind() -> (WsListener, String) {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("should have addr").to_string();
    (listener, addr)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

#[tokio::test]
async fn test_accept_and_receive_text() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.expect("should accept");
        let (_tx, mut rx) = conn.split();
        rx.recv().await.expect("recv should succeed")
    });

    let mut client = connect(&addr).await;
    client
        .send(Message::Text("hello".into()))
        .await
        .expect("client send");

    let received = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("timeout")
        .expect("server task");
    assert_eq!(received, Some("hello".to_string()));
}

#[tokio::test]
async fn test_send_text_reaches_client() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.expect("should accept");
        let (mut tx, _rx) = conn.split();
        tx.send_text("from server".to_string())
            .await
            .expect("server send");
        // Keep the connection alive until the client has read the frame.
        tokio::time::sleep(Duration::from_millis(100)).await;
    });

    let mut client = connect(&addr).await;
    let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("timeout")
        .expect("stream should yield")
        .expect("frame should be ok");
    assert_eq!(msg, Message::Text("from server".into()));
    server.await.expect("server task");
}

#[tokio::test]
async fn test_binary_utf8_frame_delivered_as_text() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.expect("should accept");
        let (_tx, mut rx) = conn.split();
        rx.recv().await.expect("recv should succeed")
    });

    let mut client = connect(&addr).await;
    client
        .send(Message::Binary(b"{\"event\":\"x\"}".to_vec().into()))
        .await
        .expect("client send");

    let received = server.await.expect("server task");
    assert_eq!(received, Some("{\"event\":\"x\"}".to_string()));
}

#[tokio::test]
async fn test_clean_close_yields_none() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let conn = listener.accept().await.expect("should accept");
        let (_tx, mut rx) = conn.split();
        rx.recv().await.expect("recv should succeed")
    });

    let mut client = connect(&addr).await;
    client.close(None).await.expect("client close");

    let received = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("timeout")
        .expect("server task");
    assert_eq!(received, None);
}

#[tokio::test]
async fn test_connection_ids_are_unique() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let a = listener.accept().await.expect("accept first");
        let b = listener.accept().await.expect("accept second");
        (a.id(), b.id())
    });

    let _c1 = connect(&addr).await;
    let _c2 = connect(&addr).await;

    let (a, b) = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("timeout")
        .expect("server task");
    assert_ne!(a, b);
}
