use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use unitwatch_core::CoreError;

use crate::state::AppState;

/// HTTP handler that upgrades `/ws/unit-readiness/{unit_id}` to WebSocket.
///
/// After the upgrade the connection is registered with
/// [`ReadinessWsManager`](crate::ws::ReadinessWsManager) and managed by two
/// tasks (sender + receiver).
pub async fn unit_readiness_ws(
    ws: WebSocketUpgrade,
    Path(unit_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, unit_id, state))
}

/// Manage a single readiness subscription after upgrade.
///
/// Computes the initial snapshot, registers the connection (snapshot
/// enqueued ahead of any broadcast), then:
///   1. Spawns a sender task that forwards messages from the manager channel.
///   2. Processes inbound messages on the current task.
///   3. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, unit_id: String, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, unit_id = %unit_id, "Readiness WebSocket connected");

    // Every subscriber receives the current readiness before any broadcast.
    // An unknown unit gets no snapshot but stays connected, matching the
    // subscribe-before-create flow.
    let initial = match state.readiness.get_unit_readiness(&unit_id).await {
        Ok(report) => Some(readiness_message(&report)),
        Err(CoreError::NotFound { .. }) => {
            tracing::debug!(unit_id = %unit_id, "No initial snapshot: unit not found");
            None
        }
        Err(e) => {
            tracing::error!(unit_id = %unit_id, error = %e, "Initial readiness snapshot failed");
            None
        }
    };

    let mut rx = state
        .ws_manager
        .add(conn_id.clone(), unit_id.clone(), initial)
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: the subscription is one-way; inbound frames only keep
    // the connection alive.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, unit_id = %unit_id, "Readiness WebSocket disconnected");
}

/// Wrap a readiness report in the wire envelope pushed to subscribers.
pub fn readiness_message(report: &unitwatch_core::readiness::ReadinessReport) -> Message {
    let envelope = serde_json::json!({
        "type": "unit_readiness",
        "data": report,
    });
    Message::Text(envelope.to_string().into())
}
