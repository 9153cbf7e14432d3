//! WebSocket feed of session snapshots.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

use moviesearch_core::{SearchSession, SessionSnapshot};

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_MESSAGES_SENT};
use crate::state::AppState;

/// Interval between heartbeats on an idle connection.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket message sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Session state after a change. Also sent once on connect.
    Snapshot { snapshot: SessionSnapshot },
    /// Server heartbeat (sent periodically to keep connection alive).
    Heartbeat { timestamp: i64 },
}

impl WsMessage {
    fn kind(&self) -> &'static str {
        match self {
            WsMessage::Snapshot { .. } => "snapshot",
            WsMessage::Heartbeat { .. } => "heartbeat",
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let Some(session) = state.session().cloned() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Movie search is not configured",
        )
            .into_response();
    };
    ws.on_upgrade(|socket| handle_socket(socket, session))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, session: SearchSession) {
    let (mut sender, mut receiver) = socket.split();

    let mut updates = session.subscribe();

    // Track connection metrics
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("WebSocket client connected");

    // Forward snapshots and heartbeats to this client
    let send_task = tokio::spawn(async move {
        let mut heartbeat = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);
        let mut next = Some(WsMessage::Snapshot {
            snapshot: updates.borrow_and_update().clone(),
        });

        loop {
            if let Some(msg) = next.take() {
                WS_MESSAGES_SENT.with_label_values(&[msg.kind()]).inc();
                match serde_json::to_string(&msg) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket send failed, client disconnected");
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to serialize WsMessage: {}", e);
                    }
                }
            }

            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        debug!("Session closed");
                        break;
                    }
                    // Intermediate states may be skipped; the latest wins.
                    next = Some(WsMessage::Snapshot {
                        snapshot: updates.borrow_and_update().clone(),
                    });
                }
                _ = heartbeat.tick() => {
                    next = Some(WsMessage::Heartbeat {
                        timestamp: chrono::Utc::now().timestamp(),
                    });
                }
            }
        }
    });

    // Handle incoming messages from client (ping/pong, close)
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Ping(data)) => {
                // Pong is handled automatically by axum
                debug!("Received ping: {:?}", data);
            }
            Ok(Message::Text(text)) => {
                // Commands go through the HTTP API
                debug!("Ignoring text message: {}", text);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    // Clean up
    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("WebSocket client disconnected");
}
