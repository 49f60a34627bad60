use super::AppState;
use crate::messenger::{Connection, RawCommand, ServerEvent};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;

/// GET /ws/creator
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (connection, mut outbound) = Connection::open();

    // Only this task touches the sink; dispatch never awaits a socket write.
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(error) = sink.send(Message::Text(text.into())).await {
                tracing::debug!("websocket send error: {error}");
                break;
            }
        }
        let _ = sink.close().await;
    });

    state.messenger.connect(&connection);

    while let Some(result) = stream.next().await {
        let message = match result {
            Ok(message) => message,
            Err(error) => {
                tracing::debug!("websocket receive error: {error}");
                break;
            }
        };

        match message {
            Message::Text(text) => handle_text(&state, &connection, text.as_str()),
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.messenger.disconnect(&connection);
    drop(connection);
    if let Err(error) = writer.await {
        tracing::debug!("websocket writer task failed: {error}");
    }
}

fn handle_text(state: &AppState, connection: &Connection, text: &str) {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => {
            state
                .messenger
                .send(connection, &ServerEvent::error("Invalid JSON format"));
            return;
        }
    };

    match RawCommand::from_value(value) {
        Ok(raw) => {
            state.messenger.handle_command(Some(connection), &raw);
        }
        Err(error) => state
            .messenger
            .send(connection, &ServerEvent::error(error.to_string())),
    }
}
