use crate::state::HarnessState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::interval;

/// WebSocket handler streaming classifier events
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<HarnessState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: HarnessState) {
    let (mut sender, mut receiver) = socket.split();

    let mut events = state.component.subscribe();
    let metrics = state.component.metrics().clone();

    // Event forwarding with a periodic metrics update
    let mut send_task = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        loop {
            let text = tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => serde_json::to_string(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "websocket client lagging");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = ticker.tick() => serde_json::to_string(&json!({
                    "type": "MetricsUpdate",
                    "data": metrics.snapshot(),
                })),
            };

            match text {
                Ok(msg) => {
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                }
            }
        }
    });

    // Clients may post bridge messages over the socket too
    let component = state.component.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                Message::Text(text) => component.handle_message_str(&text),
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            tracing::debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            tracing::debug!("Receive task completed");
            send_task.abort();
        }
    }
}
