use std::fmt::{Display, Formatter};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot::Sender as OneshotSender;

use crate::config::RoomSettings;
use crate::error::Error;
use crate::export::Exporter;
use crate::room::actor_client::RoomClient;
use crate::room_factory::actor_client::RoomFactoryClient;
use crate::room_factory::{RoomFactory, RoomOptions};

pub struct RoomFactoryActor {
    room_factory: RoomFactory,
    room_factory_rx: Receiver<RoomFactoryCommand>,
    room_factory_tx: Sender<RoomFactoryCommand>,
}

impl RoomFactoryActor {
    /// Runs the RoomFactory Actor in background and returns a Client to communicate with it
    pub fn spawn(room_settings: RoomSettings, exporter: Exporter) -> RoomFactoryClient {
        let room_factory = RoomFactory::new(room_settings, exporter);
        let (room_factory_tx, room_factory_rx): (
            Sender<RoomFactoryCommand>,
            Receiver<RoomFactoryCommand>,
        ) = mpsc::channel(512);

        tokio::spawn(
            RoomFactoryActor {
                room_factory,
                room_factory_rx,
                room_factory_tx: room_factory_tx.clone(),
            }
            .start(),
        );

        RoomFactoryClient { room_factory_tx }
    }

    async fn start(mut self) {
        while let Some(message) = self.room_factory_rx.recv().await {
            let (result, response_channel) = match message {
                RoomFactoryCommand::CreateRoom {
                    room_id,
                    options,
                    response_channel,
                } => {
                    let result = self
                        .room_factory
                        .create_room(
                            room_id,
                            options,
                            RoomFactoryClient {
                                room_factory_tx: self.room_factory_tx.clone(),
                            },
                        )
                        .map(|room_id| RoomFactoryResponse::RoomCreated { room_id });
                    (result, response_channel)
                }
                RoomFactoryCommand::RemoveRoom {
                    room_id,
                    response_channel,
                } => {
                    let result = self.room_factory.remove_room(&room_id).map(|room| {
                        log::info!("Room removed. RoomId: '{room_id}'.");
                        RoomFactoryResponse::Room { room }
                    });
                    (result, response_channel)
                }
                RoomFactoryCommand::GetRoom {
                    room_id,
                    response_channel,
                } => {
                    let result = self
                        .room_factory
                        .get_room(&room_id)
                        .map(|room| RoomFactoryResponse::Room { room: room.clone() });
                    (result, response_channel)
                }
                RoomFactoryCommand::ListRooms { response_channel } => (
                    Ok(RoomFactoryResponse::Rooms {
                        rooms: self.room_factory.rooms(),
                    }),
                    response_channel,
                ),
            };
            let response = match result {
                Ok(response) => response,
                Err(error) => RoomFactoryResponse::Error { error },
            };
            if let Err(response) = response_channel.send(response) {
                log::debug!("Sent a RoomFactoryResponse but the response channel is closed. Response: '{response}'.");
            }
        }
    }
}

#[derive(Debug)]
pub(crate) enum RoomFactoryCommand {
    CreateRoom {
        room_id: Option<String>,
        options: RoomOptions,
        response_channel: OneshotSender<RoomFactoryResponse>,
    },
    RemoveRoom {
        room_id: String,
        response_channel: OneshotSender<RoomFactoryResponse>,
    },
    GetRoom {
        room_id: String,
        response_channel: OneshotSender<RoomFactoryResponse>,
    },
    ListRooms {
        response_channel: OneshotSender<RoomFactoryResponse>,
    },
}

#[derive(Debug)]
pub(crate) enum RoomFactoryResponse {
    RoomCreated { room_id: String },
    Room { room: RoomClient },
    Rooms { rooms: Vec<(String, RoomClient)> },
    Error { error: Error },
}

impl Display for RoomFactoryResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                RoomFactoryResponse::RoomCreated { room_id } =>
                    format!("RoomCreated(room_id: {room_id})"),
                RoomFactoryResponse::Room { room: _ } => "Room".to_string(),
                RoomFactoryResponse::Rooms { rooms } => format!("Rooms(len: {})", rooms.len()),
                RoomFactoryResponse::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}
