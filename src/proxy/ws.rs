//! # WebSocket Bridging
//!
//! Answers the client's upgrade, opens a second WebSocket to the backend for
//! the same (rewritten) path, and pumps messages both ways until either side
//! closes. A failed backend connection closes the client socket; nothing
//! here is ever fatal to the process.

use axum::extract::ws::{CloseFrame, Message as ClientMessage, WebSocket, WebSocketUpgrade};
use axum::extract::Request;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame as BackendCloseFrame;
use tokio_tungstenite::tungstenite::Message as BackendMessage;

use super::rewrite::apply_rewrites;
use super::ProxyState;

pub fn bridge(proxy: &ProxyState, upgrade: WebSocketUpgrade, req: &Request) -> Response {
    let mut backend_url = format!(
        "{}{}",
        proxy.ws_target(),
        apply_rewrites(&proxy.rewrites, req.uri().path())
    );
    if let Some(query) = req.uri().query() {
        backend_url.push('?');
        backend_url.push_str(query);
    }

    upgrade.on_upgrade(move |client| bridge_socket(client, backend_url))
}

async fn bridge_socket(client: WebSocket, backend_url: String) {
    let (backend, _) = match connect_async(backend_url.as_str()).await {
        Ok(connected) => connected,
        Err(e) => {
            error!(
                "❌ WebSocket proxy could not reach backend {}: {}",
                backend_url, e
            );
            return;
        }
    };

    let (mut client_tx, mut client_rx) = client.split();
    let (mut backend_tx, mut backend_rx) = backend.split();

    let client_to_backend = async {
        while let Some(Ok(message)) = client_rx.next().await {
            if backend_tx.send(into_backend(message)).await.is_err() {
                break;
            }
        }
    };

    let backend_to_client = async {
        while let Some(Ok(message)) = backend_rx.next().await {
            let Some(message) = into_client(message) else {
                continue;
            };
            if client_tx.send(message).await.is_err() {
                break;
            }
        }
    };

    // Whichever direction finishes first (close or error) tears down both
    // sockets when the select drops the other future.
    tokio::select! {
        _ = client_to_backend => debug!("🔌 WebSocket client side closed"),
        _ = backend_to_client => debug!("🔌 WebSocket backend side closed"),
    }
}

fn into_backend(message: ClientMessage) -> BackendMessage {
    match message {
        ClientMessage::Text(text) => BackendMessage::Text(text),
        ClientMessage::Binary(data) => BackendMessage::Binary(data),
        ClientMessage::Ping(data) => BackendMessage::Ping(data),
        ClientMessage::Pong(data) => BackendMessage::Pong(data),
        ClientMessage::Close(frame) => BackendMessage::Close(frame.map(|f| BackendCloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason,
        })),
    }
}

fn into_client(message: BackendMessage) -> Option<ClientMessage> {
    match message {
        BackendMessage::Text(text) => Some(ClientMessage::Text(text)),
        BackendMessage::Binary(data) => Some(ClientMessage::Binary(data)),
        BackendMessage::Ping(data) => Some(ClientMessage::Ping(data)),
        BackendMessage::Pong(data) => Some(ClientMessage::Pong(data)),
        BackendMessage::Close(frame) => Some(ClientMessage::Close(frame.map(|f| CloseFrame {
            code: f.code.into(),
            reason: f.reason,
        }))),
        // Raw frames never surface from a managed stream read.
        BackendMessage::Frame(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_binary_round_trip_between_message_types() {
        let text = into_backend(ClientMessage::Text("hola".to_string()));
        assert!(matches!(text, BackendMessage::Text(ref t) if t == "hola"));

        let binary = into_client(BackendMessage::Binary(vec![1, 2, 3])).unwrap();
        assert!(matches!(binary, ClientMessage::Binary(ref b) if b == &[1, 2, 3]));
    }

    #[test]
    fn close_frames_carry_code_and_reason() {
        let close = into_backend(ClientMessage::Close(Some(CloseFrame {
            code: 1001,
            reason: "going away".into(),
        })));
        match close {
            BackendMessage::Close(Some(frame)) => {
                assert_eq!(u16::from(frame.code), 1001);
                assert_eq!(frame.reason, "going away");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
