//! WebSocket Connection Handler
//!
//! Upgrades clients to a persistent WebSocket and bridges the socket to the
//! dispatcher: inbound text frames are handed to the dispatcher, outbound
//! events are drained from the connection's queue by a writer task.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::relay::{ConnectionId, Outbound};
use crate::startup::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.max_message_size(state.settings.websocket.max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn = ConnectionId::next();
    tracing::debug!(%conn, "new websocket connection");

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();
    let (outbound, mut rx) = Outbound::channel();

    // Forward queued events to the socket
    let writer_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize event");
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Read loop: every inbound frame is handled to completion before the next
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                state.dispatcher.handle_frame(conn, &outbound, &text);
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(%conn, "connection closed");
                break;
            }
            Ok(_) => {
                // Ping/pong handled automatically by axum; binary ignored
            }
            Err(e) => {
                // Transport error: treat as a close for cleanup purposes
                tracing::debug!(%conn, error = %e, "websocket error");
                break;
            }
        }
    }

    // Cleanup: announce the departure, then tear down the writer
    state.dispatcher.handle_close(conn);
    writer_task.abort();

    tracing::debug!(%conn, "websocket connection finished");
}
