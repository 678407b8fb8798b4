pub mod actor;
pub mod actor_client;

use rand::distributions::{Alphanumeric, DistString};
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::RoomSettings;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::export::Exporter;
use crate::room::actor::RoomActor;
use crate::room::actor_client::RoomClient;
use crate::room_factory::actor_client::RoomFactoryClient;
use crate::round::LetterDrawer;

/// Per-room overrides of the default room settings.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomOptions {
    pub categories: Option<Vec<String>>,
    pub max_players: Option<usize>,
}

pub struct RoomFactory {
    rooms: HashMap<String, RoomClient>,
    room_settings: RoomSettings,
    exporter: Exporter,
}

impl RoomFactory {
    pub fn new(room_settings: RoomSettings, exporter: Exporter) -> Self {
        log::info!(
            "Default categories loaded. Categories: '{}'.",
            room_settings.categories.join(",")
        );
        RoomFactory {
            rooms: HashMap::default(),
            room_settings,
            exporter,
        }
    }

    /// Creates a room with the given id, or with a generated one.
    pub fn create_room(
        &mut self,
        room_id: Option<String>,
        options: RoomOptions,
        room_factory: RoomFactoryClient,
    ) -> Result<String, Error> {
        let id = match room_id {
            Some(id) if self.rooms.contains_key(&id) => {
                return Err(Error::Domain(DomainError::RoomAlreadyExists(id)))
            }
            Some(id) => id,
            None => self.create_unique_room_id(),
        };

        let settings = self.room_settings(options);
        log::info!(
            "Room created. RoomId: '{id}', Categories: '{}', MaximumPlayers: '{}'.",
            settings.categories.join(","),
            settings.maximum_players
        );
        self.rooms.insert(
            id.clone(),
            RoomActor::spawn(
                &id,
                settings,
                LetterDrawer::from_entropy(),
                self.exporter.clone(),
                room_factory,
            ),
        );

        Ok(id)
    }

    fn room_settings(&self, options: RoomOptions) -> RoomSettings {
        let mut settings = self.room_settings.clone();
        if let Some(categories) = options.categories.filter(|categories| !categories.is_empty()) {
            settings.categories = categories;
        }
        if let Some(max_players) = options.max_players.filter(|max_players| *max_players > 0) {
            settings.maximum_players = max_players;
        }
        settings
    }

    pub fn remove_room(&mut self, room_id: &str) -> Result<RoomClient, Error> {
        self.rooms
            .remove(room_id)
            .ok_or_else(|| Error::Domain(DomainError::RoomNotFound(room_id.to_string())))
    }

    pub fn get_room(&self, room_id: &str) -> Result<&RoomClient, Error> {
        match self.rooms.get(room_id) {
            Some(room) => Ok(room),
            None => Err(Error::Domain(DomainError::RoomNotFound(
                room_id.to_string(),
            ))),
        }
    }

    pub fn rooms(&self) -> Vec<(String, RoomClient)> {
        let mut rooms: Vec<(String, RoomClient)> = self
            .rooms
            .iter()
            .map(|(id, room)| (id.clone(), room.clone()))
            .collect();
        rooms.sort_by(|(first, _), (second, _)| first.cmp(second));
        rooms
    }

    fn create_unique_room_id(&self) -> String {
        loop {
            let id = Alphanumeric
                .sample_string(&mut rand::thread_rng(), 5)
                .replace('O', "P")
                .replace('0', "1")
                .replace('I', "J")
                .replace('l', "m");
            if !self.rooms.contains_key(&id) {
                return id;
            }
        }
    }
}
