use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::room::actor::{RoomCommand, RoomResponse, RoomWideEvent};
use crate::room::{PlayerView, RoomStats, Words};
use crate::round::vote_tally::PlayerVotes;

#[derive(Clone, Debug)]
pub struct RoomClient {
    pub(super) room_tx: Sender<RoomCommand>,
}

impl RoomClient {
    pub async fn add_player(
        &self,
        player_id: &str,
        nickname: &str,
    ) -> Result<RoomWideEventReceiver, Error> {
        let (tx, rx): (OneshotSender<RoomResponse>, OneshotReceiver<RoomResponse>) =
            oneshot::channel();

        self.send_command(
            RoomCommand::AddPlayer {
                player_id: player_id.to_string(),
                nickname: nickname.to_string(),
                response_tx: tx,
            },
            // The room is still registered but its actor already stopped
            "The Room is not alive. Can't add Player to Room",
        )
        .await?;

        match rx.await {
            Ok(RoomResponse::PlayerAdded { broadcast_rx }) => {
                Ok(RoomWideEventReceiver { broadcast_rx })
            }
            response => Err(RoomClient::handle_response_error(response)),
        }
    }

    pub async fn remove_player(&self, player_id: &str) -> Result<(), Error> {
        self.send_command(
            RoomCommand::RemovePlayer {
                player_id: player_id.to_string(),
            },
            "Tried to send RoomCommand::RemovePlayer but RoomActor is not listening",
        )
        .await
    }

    pub async fn kick_player(&self, player_id: &str) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::KickPlayer {
                player_id: player_id.to_string(),
                response_tx: tx,
            },
            "Tried to send RoomCommand::KickPlayer but RoomActor is not listening",
        )
        .await?;
        RoomClient::expect_ok(rx.await)
    }

    pub async fn submit_words(&self, player_id: &str, words: Words) -> Result<(), Error> {
        self.send_command(
            RoomCommand::SubmitWords {
                player_id: player_id.to_string(),
                words,
            },
            "Tried to send RoomCommand::SubmitWords but RoomActor is not listening",
        )
        .await
    }

    pub async fn submit_votes(&self, player_id: &str, votes: PlayerVotes) -> Result<(), Error> {
        self.send_command(
            RoomCommand::SubmitVotes {
                player_id: player_id.to_string(),
                votes,
            },
            "Tried to send RoomCommand::SubmitVotes but RoomActor is not listening",
        )
        .await
    }

    pub async fn request_advance(&self) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::Advance { response_tx: tx },
            "Tried to send RoomCommand::Advance but RoomActor is not listening",
        )
        .await?;
        RoomClient::expect_ok(rx.await)
    }

    pub async fn start(&self) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::Start { response_tx: tx },
            "Tried to send RoomCommand::Start but RoomActor is not listening",
        )
        .await?;
        RoomClient::expect_ok(rx.await)
    }

    pub async fn restart(&self) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::Restart { response_tx: tx },
            "Tried to send RoomCommand::Restart but RoomActor is not listening",
        )
        .await?;
        RoomClient::expect_ok(rx.await)
    }

    pub async fn end(&self) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::End { response_tx: tx },
            "Tried to send RoomCommand::End but RoomActor is not listening",
        )
        .await?;
        RoomClient::expect_ok(rx.await)
    }

    pub async fn get_snapshot(&self, player_id: &str) -> Result<PlayerView, Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::GetSnapshot {
                player_id: player_id.to_string(),
                response_tx: tx,
            },
            "Tried to send RoomCommand::GetSnapshot but RoomActor is not listening",
        )
        .await?;

        match rx.await {
            Ok(RoomResponse::Snapshot { view }) => Ok(view),
            response => Err(RoomClient::handle_response_error(response)),
        }
    }

    pub async fn get_stats(&self) -> Result<RoomStats, Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::GetStats { response_tx: tx },
            "Tried to send RoomCommand::GetStats but RoomActor is not listening",
        )
        .await?;

        match rx.await {
            Ok(RoomResponse::Stats { stats }) => Ok(stats),
            response => Err(RoomClient::handle_response_error(response)),
        }
    }

    /// Stops the room actor and disconnects its players.
    pub async fn close(&self) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        self.send_command(
            RoomCommand::Close { response_tx: tx },
            "Tried to send RoomCommand::Close but RoomActor is not listening",
        )
        .await?;
        RoomClient::expect_ok(rx.await)
    }

    async fn send_command(&self, command: RoomCommand, error_message: &str) -> Result<(), Error> {
        self.room_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!("{error_message}. Error: '{error}'."))
        })
    }

    fn expect_ok(response: Result<RoomResponse, RecvError>) -> Result<(), Error> {
        match response {
            Ok(RoomResponse::Ok) => Ok(()),
            response => Err(RoomClient::handle_response_error(response)),
        }
    }

    fn handle_response_error(response: Result<RoomResponse, RecvError>) -> Error {
        match response {
            Ok(RoomResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected RoomResponse. RoomResponse: '{unexpected_response}'."
            )),
            Err(_) => Error::log_and_create_internal(
                "Sent a command to the Room actor, but the actor channel died.",
            ),
        }
    }
}

pub struct RoomWideEventReceiver {
    broadcast_rx: broadcast::Receiver<RoomWideEvent>,
}

impl RoomWideEventReceiver {
    /// Waits for the next room event. A lagging receiver skips to the most recent events, the
    /// room state is always sent whole.
    pub async fn next(&mut self) -> Result<RoomWideEvent, Error> {
        loop {
            match self.broadcast_rx.recv().await {
                Ok(event) => return Ok(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Player fell behind the room events. Skipped: '{skipped}'.");
                }
                Err(error) => {
                    return Err(Error::WebsocketClosed(format!(
                        "The broadcast channel with the Room has been closed. Error: {error}."
                    )))
                }
            }
        }
    }
}
