use std::time::Duration;

use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub struct TestPlayer {
    pub id: String,
    pub tx: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>,
    pub rx: SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ServerMessage {
    GameState(GameState),
    Error {
        r#type: String,
        title: String,
        detail: String,
    },
    Kicked,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: String,
    pub other_players: Vec<String>,
    pub deadline: Option<String>,
    pub phase_data: Value,
}

impl GameState {
    pub fn letter(&self) -> String {
        self.phase_data["letter"]
            .as_str()
            .expect("The state has no letter")
            .to_string()
    }
}

impl TestPlayer {
    pub async fn receive_text(&mut self) -> Result<String, String> {
        loop {
            match time::timeout(Duration::from_secs(5), self.rx.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => return Ok(text),
                Ok(Some(Ok(Message::Close(_)))) | Ok(None) => {
                    return Err("Websocket closed before expected.".to_string())
                }
                Ok(Some(Ok(_))) => continue,
                Ok(Some(Err(error))) => return Err(format!("Websocket returned an error {error}")),
                Err(_) => return Err("No message received in time.".to_string()),
            }
        }
    }

    pub async fn receive_message(&mut self) -> Result<ServerMessage, String> {
        let text = self.receive_text().await?;
        serde_json::from_str(&text)
            .map_err(|error| format!("Could not parse the message. Error: '{error}'."))
    }

    /// Returns the error type when the server answered with an error.
    pub async fn receive_game_state(&mut self) -> Result<GameState, String> {
        match self.receive_message().await? {
            ServerMessage::GameState(state) => Ok(state),
            ServerMessage::Error {
                r#type,
                title,
                detail,
            } => {
                assert!(!title.is_empty());
                assert!(!detail.is_empty());
                Err(r#type)
            }
            ServerMessage::Kicked => Err("KICKED".to_string()),
        }
    }

    /// Skips states until the room reaches `phase`.
    pub async fn wait_for_phase(&mut self, phase: &str) -> GameState {
        loop {
            let state = self.receive_game_state().await.unwrap();
            if state.phase == phase {
                return state;
            }
        }
    }

    pub async fn submit_words(&mut self, words: Value) {
        self.send_json(json!({"kind": "submitWords", "words": words}))
            .await;
        self.sync().await;
    }

    pub async fn submit_votes(&mut self, votes: Value) {
        self.send_json(json!({"kind": "submitVotes", "votes": votes}))
            .await;
        self.sync().await;
    }

    /// Messages are handled in order, so the pong proves the previous message reached the room.
    pub async fn sync(&mut self) {
        self.send_message(Message::Text("ping".to_string())).await;
        assert_eq!(self.receive_text().await.unwrap(), "pong");
    }

    pub async fn send_message(&mut self, message: Message) {
        self.tx.send(message).await.expect("Could not send message");
    }

    async fn send_json(&mut self, value: Value) {
        self.send_message(Message::Text(value.to_string())).await;
    }
}
