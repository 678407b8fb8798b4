pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::Error;

use self::message::{WsMessageIn, WsMessageOut};

pub async fn send_error_and_close(mut websocket: WebSocket, error: &Error) {
    send_error(&mut websocket, error).await;
    close(websocket).await;
}

pub async fn send_error(websocket: &mut WebSocket, error: &Error) {
    // The socket may already be gone, there is nobody left to tell
    if let Err(error) = send_message(websocket, &error_to_ws_error(error)).await {
        log::debug!("Could not send an error to the player. Error: '{error}'.");
    }
}

pub async fn close(websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::debug!("Could not close the WebSocket. Error: '{error}'.")
    }
}

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(error.to_string(), message.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;

    send_message_string(websocket, &message).await
}

pub async fn send_message_string(websocket: &mut WebSocket, message: &str) -> Result<(), Error> {
    websocket
        .send(Message::Text(message.to_string()))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}

pub fn error_to_ws_error(error: &Error) -> WsMessageOut {
    WsMessageOut::Error {
        r#type: error.code(),
        title: error.title(),
        detail: error.to_string(),
    }
}
