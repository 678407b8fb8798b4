use axum::extract::ws::{Message, WebSocket};
use std::time::Duration;
use tokio::select;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::error::Error;
use crate::player::Player;
use crate::room::actor::RoomWideEvent;
use crate::room::actor_client::{RoomClient, RoomWideEventReceiver};
use crate::websocket::message::{WsMessageIn, WsMessageOut};
use crate::websocket::{close, parse_message, send_error, send_message, send_message_string};

/// One player's WebSocket session: forwards room events to the socket and socket frames to the
/// room.
pub struct PlayerActor {
    player: Player,
    room: RoomClient,
    room_wide_event_receiver: RoomWideEventReceiver,
    websocket: WebSocket,
    inactivity_timeout: Duration,
}

impl PlayerActor {
    pub async fn create(
        player: Player,
        room: RoomClient,
        mut websocket: WebSocket,
        inactivity_timeout: Duration,
    ) {
        match room.add_player(&player.id, &player.nickname).await {
            Ok(room_wide_event_receiver) => {
                PlayerActor {
                    player,
                    room,
                    room_wide_event_receiver,
                    websocket,
                    inactivity_timeout,
                }
                .start()
                .await
            }
            Err(error) => {
                send_error(&mut websocket, &error).await;
                close(websocket).await;
            }
        }
    }

    async fn start(mut self) {
        log::info!(
            "Player connected. PlayerId: '{}', Nickname: '{}'.",
            self.player.id,
            self.player.nickname
        );
        let mut removed_by_room = false;

        loop {
            select! {
                room_wide_event = self.room_wide_event_receiver.next() => {
                    match self.receive_room_wide_event(room_wide_event).await {
                        Ok(true) => {}
                        Ok(false) => {
                            removed_by_room = true;
                            break;
                        }
                        Err(error) => {
                            send_error(&mut self.websocket, &error).await;
                            if PlayerActor::should_close_websocket(&error) {
                                break;
                            }
                        }
                    }
                },
                websocket_message = timeout(self.inactivity_timeout, self.websocket.recv()) => {
                    if let Err(error) = self.receive_websocket_message(websocket_message).await {
                        send_error(&mut self.websocket, &error).await;
                        if PlayerActor::should_close_websocket(&error) {
                            break;
                        }
                    }
                },
            }
        }

        if !removed_by_room {
            let _ = self.room.remove_player(&self.player.id).await;
        }
        close(self.websocket).await;
    }

    fn should_close_websocket(error: &Error) -> bool {
        match error {
            Error::Internal(_) => true,
            Error::WebsocketClosed(_) => true,
            Error::UnprocessableMessage(_, _) => false,
            Error::Domain(_) => false,
        }
    }

    /// Returns false once the player no longer belongs to the room.
    async fn receive_room_wide_event(
        &mut self,
        room_wide_event: Result<RoomWideEvent, Error>,
    ) -> Result<bool, Error> {
        match room_wide_event? {
            RoomWideEvent::RoomState(snapshot) => {
                send_message(
                    &mut self.websocket,
                    &WsMessageOut::GameState(snapshot.view_for(&self.player.id)),
                )
                .await?;
                Ok(true)
            }
            RoomWideEvent::PlayerKicked { player_id } if player_id == self.player.id => {
                log::info!("Player kicked. PlayerId: '{player_id}'.");
                // Best effort, the socket is closed right after
                let _ = send_message(&mut self.websocket, &WsMessageOut::Kicked).await;
                Ok(false)
            }
            RoomWideEvent::PlayerKicked { .. } => Ok(true),
            RoomWideEvent::RoomClosed => Ok(false),
        }
    }

    async fn receive_websocket_message(
        &mut self,
        websocket_message: Result<Option<Result<Message, axum::Error>>, Elapsed>,
    ) -> Result<(), Error> {
        match websocket_message {
            Ok(Some(Ok(Message::Text(txt)))) => match txt.as_str() {
                "ping" => send_message_string(&mut self.websocket, "pong").await,
                message => match parse_message(message)? {
                    WsMessageIn::SubmitWords { words } => {
                        self.room.submit_words(&self.player.id, words).await
                    }
                    WsMessageIn::SubmitVotes { votes } => {
                        self.room.submit_votes(&self.player.id, votes).await
                    }
                },
            },
            // browser said "close"
            Ok(Some(Ok(Message::Close(_)))) => {
                self.log_connection_lost_with_player("browser sent 'Close' websocket frame");
                Err(Error::WebsocketClosed(
                    "browser sent 'Close' websocket frame".to_string(),
                ))
            }
            // websocket was closed
            Ok(None) => {
                self.log_connection_lost_with_player("other end of websocket was closed abruptly");
                Err(Error::WebsocketClosed(
                    "other end of websocket was closed abruptly".to_string(),
                ))
            }
            // timeout without receiving anything from player
            Err(_) => {
                self.log_connection_lost_with_player(
                    "connection timed out; missing 'ping' messages",
                );
                Err(Error::WebsocketClosed(
                    "connection timed out; missing 'ping' messages".to_string(),
                ))
            }
            Ok(Some(Err(error))) => Err(Error::UnprocessableMessage(
                error.to_string(),
                "Message cannot be loaded".to_string(),
            )),
            // Ping and pong frames are answered by the websocket library
            Ok(Some(Ok(Message::Ping(_)))) | Ok(Some(Ok(Message::Pong(_)))) => Ok(()),
            Ok(Some(Ok(Message::Binary(_)))) => Err(Error::UnprocessableMessage(
                "Unsupported message type".to_string(),
                "binary frame".to_string(),
            )),
        }
    }

    fn log_connection_lost_with_player(&self, reason: &str) {
        log::info!(
            "Connection with player {} lost due to: {}. Stopping player actor.",
            &self.player.id,
            reason,
        );
    }
}
