use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::room::actor_client::RoomClient;
use crate::room::RoomStats;
use crate::room_factory::actor::{RoomFactoryCommand, RoomFactoryResponse};
use crate::room_factory::RoomOptions;

#[derive(Clone, Debug)]
pub struct RoomFactoryClient {
    pub(crate) room_factory_tx: Sender<RoomFactoryCommand>,
}

impl RoomFactoryClient {
    pub async fn create_room(
        &self,
        room_id: Option<String>,
        options: RoomOptions,
    ) -> Result<String, Error> {
        let (tx, rx): (
            OneshotSender<RoomFactoryResponse>,
            OneshotReceiver<RoomFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            RoomFactoryCommand::CreateRoom {
                room_id,
                options,
                response_channel: tx,
            },
            "The RoomFactory is not alive. Can't create Room",
        )
        .await?;

        match rx.await {
            Ok(RoomFactoryResponse::RoomCreated { room_id }) => Ok(room_id),
            error => Err(RoomFactoryClient::handle_event_error(error)),
        }
    }

    /// Deregisters the room and stops it.
    pub async fn delete_room(&self, room_id: &str) -> Result<(), Error> {
        let room = self.take_room(room_id).await?;
        // The room may already be stopping on its own
        if let Err(error) = room.close().await {
            log::debug!("Room stopped before it could be closed. RoomId: '{room_id}', Error: '{error}'.");
        }
        Ok(())
    }

    /// Deregisters the room, used by a room actor that is stopping on its own.
    pub async fn remove_room(&self, room_id: &str) -> Result<(), Error> {
        self.take_room(room_id).await.map(|_| ())
    }

    async fn take_room(&self, room_id: &str) -> Result<RoomClient, Error> {
        let (tx, rx): (
            OneshotSender<RoomFactoryResponse>,
            OneshotReceiver<RoomFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            RoomFactoryCommand::RemoveRoom {
                room_id: room_id.to_string(),
                response_channel: tx,
            },
            "The RoomFactory channel is closed",
        )
        .await?;

        match rx.await {
            Ok(RoomFactoryResponse::Room { room }) => Ok(room),
            error => Err(RoomFactoryClient::handle_event_error(error)),
        }
    }

    pub async fn get_room(&self, room_id: &str) -> Result<RoomClient, Error> {
        let (tx, rx): (
            OneshotSender<RoomFactoryResponse>,
            OneshotReceiver<RoomFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            RoomFactoryCommand::GetRoom {
                room_id: room_id.to_string(),
                response_channel: tx,
            },
            "The RoomFactory channel is closed",
        )
        .await?;

        match rx.await {
            Ok(RoomFactoryResponse::Room { room }) => Ok(room),
            error => Err(RoomFactoryClient::handle_event_error(error)),
        }
    }

    async fn list_rooms(&self) -> Result<Vec<(String, RoomClient)>, Error> {
        let (tx, rx): (
            OneshotSender<RoomFactoryResponse>,
            OneshotReceiver<RoomFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            RoomFactoryCommand::ListRooms {
                response_channel: tx,
            },
            "The RoomFactory channel is closed",
        )
        .await?;

        match rx.await {
            Ok(RoomFactoryResponse::Rooms { rooms }) => Ok(rooms),
            error => Err(RoomFactoryClient::handle_event_error(error)),
        }
    }

    /// Stats of every live room. Rooms that stop while being asked are left out.
    pub async fn stats(&self) -> Result<Vec<RoomStats>, Error> {
        let mut stats = Vec::new();
        for (room_id, room) in self.list_rooms().await? {
            match room.get_stats().await {
                Ok(room_stats) => stats.push(room_stats),
                Err(error) => log::debug!(
                    "Skipped the stats of a stopped room. RoomId: '{room_id}', Error: '{error}'."
                ),
            }
        }
        Ok(stats)
    }

    /// Ends the game in every room, returns how many rooms were ended.
    pub async fn end_all(&self) -> Result<usize, Error> {
        let mut ended = 0;
        for (room_id, room) in self.list_rooms().await? {
            match room.end().await {
                Ok(()) => ended += 1,
                Err(error) => log::warn!(
                    "Could not end the game. RoomId: '{room_id}', Error: '{error}'."
                ),
            }
        }
        Ok(ended)
    }

    async fn send_command(
        &self,
        command: RoomFactoryCommand,
        error_message: &str,
    ) -> Result<(), Error> {
        self.room_factory_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!("{error_message}. Error: '{error}'"))
        })
    }

    fn handle_event_error(error: Result<RoomFactoryResponse, RecvError>) -> Error {
        match error {
            Ok(RoomFactoryResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected RoomFactoryResponse. RoomFactoryResponse: '{unexpected_response}'."
            )),
            _ => Error::log_and_create_internal(
                "Sent a command to the RoomFactory actor, but the actor channel died.",
            ),
        }
    }
}
