//! Shared fixtures for the integration tests

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use spotwire::{build_connector, BinanceConnector, ExchangeConfig};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
pub const TEST_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Connector with credentials pointed at the mock server
pub fn signed_connector(server: &MockServer) -> BinanceConnector {
    let config = ExchangeConfig::new(TEST_API_KEY.to_string(), TEST_SECRET.to_string())
        .base_url(server.uri());
    build_connector(config).expect("connector should build")
}

/// Connector without credentials pointed at the mock server
pub fn public_connector(server: &MockServer) -> BinanceConnector {
    build_connector(ExchangeConfig::read_only().base_url(server.uri()))
        .expect("connector should build")
}

/// Connector whose streams resolve against a local WebSocket server
pub fn stream_connector(ws_base: &str) -> BinanceConnector {
    build_connector(ExchangeConfig::read_only().ws_url(ws_base.to_string()))
        .expect("connector should build")
}

/// Independent re-derivation of the request signature
pub fn hmac_hex(message: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(TEST_SECRET.as_bytes()).expect("any key size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Split a signed payload into the signed part and the signature
pub fn split_signature(payload: &str) -> (&str, &str) {
    payload
        .rsplit_once("&signature=")
        .expect("payload should carry a signature")
}

/// What a test server should do with one accepted connection
pub enum ServerStep {
    Send(Message),
    /// Wait until the test says go
    Hold,
    Close,
}

/// Local WebSocket server accepting a single connection
///
/// Returns the stream base address, a trigger for `ServerStep::Hold` and a
/// receiver of the request path the client connected to.
pub async fn spawn_ws_server(
    steps: Vec<ServerStep>,
) -> (String, mpsc::Sender<()>, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");
    let (go_tx, mut go_rx) = mpsc::channel::<()>(1);
    let (path_tx, path_rx) = mpsc::channel::<String>(1);

    tokio::spawn(async move {
        let (conn, _) = listener.accept().await.expect("accept");
        let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            let _ = path_tx.try_send(request.uri().path().to_string());
            Ok(response)
        };
        let websocket = tokio_tungstenite::accept_hdr_async(conn, callback)
            .await
            .expect("handshake");
        let (mut sender, mut receiver) = websocket.split();

        for step in steps {
            match step {
                ServerStep::Send(message) => {
                    if sender.send(message).await.is_err() {
                        return;
                    }
                }
                ServerStep::Hold => {
                    let _ = go_rx.recv().await;
                }
                ServerStep::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                }
            }
        }

        // Keep the socket alive until the client goes away
        while let Some(Ok(_)) = receiver.next().await {}
    });

    (format!("ws://{}/ws", address), go_tx, path_rx)
}
