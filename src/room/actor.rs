use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast,
    mpsc::{self, Receiver, Sender, WeakSender},
};
use tokio::time;

use crate::config::RoomSettings;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::export::Exporter;
use crate::metrics::{ACTIVE_ROOMS, CONNECTED_PLAYERS};
use crate::room::actor_client::RoomClient;
use crate::room::scheduler::PhaseScheduler;
use crate::room::{PlayerView, Room, RoomEvent, RoomSnapshot, RoomStats, Words};
use crate::room_factory::actor_client::RoomFactoryClient;
use crate::round::vote_tally::PlayerVotes;
use crate::round::LetterDrawer;

pub struct RoomActor {
    room: Room,
    room_rx: Receiver<RoomCommand>,
    // Weak so that the pending countdown never keeps the room alive
    room_tx: WeakSender<RoomCommand>,
    broadcast_tx: broadcast::Sender<RoomWideEvent>,
    scheduler: PhaseScheduler,
    exporter: Exporter,
    room_factory: RoomFactoryClient,
    inactivity_timeout: Duration,
    deadline_lead: chrono::Duration,
}

impl RoomActor {
    pub fn spawn(
        id: &str,
        settings: RoomSettings,
        letters: LetterDrawer,
        exporter: Exporter,
        room_factory: RoomFactoryClient,
    ) -> RoomClient {
        let (room_tx, room_rx): (Sender<RoomCommand>, Receiver<RoomCommand>) = mpsc::channel(128);
        let (broadcast_tx, _): (
            broadcast::Sender<RoomWideEvent>,
            broadcast::Receiver<RoomWideEvent>,
        ) = broadcast::channel(32);

        let inactivity_timeout = settings.inactivity_timeout();
        let deadline_lead =
            chrono::Duration::from_std(settings.deadline_lead()).unwrap_or_else(|error| {
                log::error!("Invalid deadline lead, sending exact deadlines. RoomId: '{id}', Error: '{error}'.");
                chrono::Duration::zero()
            });

        tokio::spawn(
            RoomActor {
                room: Room::new(id, settings, letters),
                room_rx,
                room_tx: room_tx.downgrade(),
                broadcast_tx,
                scheduler: PhaseScheduler::default(),
                exporter,
                room_factory,
                inactivity_timeout,
                deadline_lead,
            }
            .start(),
        );

        RoomClient { room_tx }
    }

    async fn start(mut self) {
        ACTIVE_ROOMS.inc();
        let mut closed_by_factory = false;

        loop {
            match time::timeout(self.inactivity_timeout, self.room_rx.recv()).await {
                Err(_) => {
                    if self.room.is_empty() {
                        log::info!(
                            "No activity detected in room {} after {} seconds. Stopping room actor.",
                            self.room.id(),
                            self.inactivity_timeout.as_secs()
                        );
                        break;
                    }
                }
                Ok(None) => {
                    log::info!("Room channel has been dropped. Stopping room actor.");
                    break;
                }
                Ok(Some(RoomCommand::Close { response_tx })) => {
                    log::info!("Room closed. RoomId: '{}'.", self.room.id());
                    let _ = self.broadcast_tx.send(RoomWideEvent::RoomClosed);
                    let _ = response_tx.send(RoomResponse::Ok);
                    closed_by_factory = true;
                    break;
                }
                Ok(Some(command)) => self.handle_command(command),
            }
        }

        self.scheduler.cancel();
        CONNECTED_PLAYERS.sub(self.room.players().len() as i64);
        if !closed_by_factory {
            self.stop_room().await;
        }
        ACTIVE_ROOMS.dec();
    }

    fn handle_command(&mut self, command: RoomCommand) {
        let response = match command {
            RoomCommand::AddPlayer {
                player_id,
                nickname,
                response_tx,
            } => {
                let result = self
                    .room
                    .add_player(&player_id, &nickname)
                    .map(|_| RoomResponse::PlayerAdded {
                        broadcast_rx: self.broadcast_tx.subscribe(),
                    });
                if result.is_ok() {
                    CONNECTED_PLAYERS.inc();
                }
                Some((result, response_tx))
            }
            RoomCommand::RemovePlayer { player_id } => {
                match self.room.remove_player(&player_id) {
                    Ok(()) => CONNECTED_PLAYERS.dec(),
                    Err(error) => log::debug!(
                        "Player already left the room. RoomId: '{}', Error: '{error}'.",
                        self.room.id()
                    ),
                }
                None
            }
            RoomCommand::KickPlayer {
                player_id,
                response_tx,
            } => {
                let result = self.room.remove_player(&player_id).map(|_| {
                    log::info!(
                        "Player kicked. RoomId: '{}', PlayerId: '{player_id}'.",
                        self.room.id()
                    );
                    CONNECTED_PLAYERS.dec();
                    let _ = self.broadcast_tx.send(RoomWideEvent::PlayerKicked {
                        player_id: player_id.clone(),
                    });
                    RoomResponse::Ok
                });
                Some((result, response_tx))
            }
            RoomCommand::SubmitWords { player_id, words } => {
                if let Err(error) = self.room.submit_words(&player_id, words) {
                    log::debug!(
                        "Ignored words. RoomId: '{}', PlayerId: '{player_id}', Error: '{error}'.",
                        self.room.id()
                    );
                }
                None
            }
            RoomCommand::SubmitVotes { player_id, votes } => {
                if let Err(error) = self.room.submit_votes(&player_id, votes) {
                    log::debug!(
                        "Ignored votes. RoomId: '{}', PlayerId: '{player_id}', Error: '{error}'.",
                        self.room.id()
                    );
                }
                None
            }
            RoomCommand::Advance { response_tx } => {
                Some((self.room.advance().map(|_| RoomResponse::Ok), response_tx))
            }
            RoomCommand::Start { response_tx } => {
                Some((self.room.start().map(|_| RoomResponse::Ok), response_tx))
            }
            RoomCommand::Restart { response_tx } => {
                Some((self.room.restart().map(|_| RoomResponse::Ok), response_tx))
            }
            RoomCommand::End { response_tx } => {
                Some((self.room.end().map(|_| RoomResponse::Ok), response_tx))
            }
            RoomCommand::PhaseTimeout { generation } => {
                if self.scheduler.is_current(generation) {
                    if let Err(error) = self.room.advance() {
                        log::error!(
                            "Could not advance the room after its phase timed out. RoomId: '{}', Error: '{error}'.",
                            self.room.id()
                        );
                    }
                } else {
                    log::debug!(
                        "Ignored a stale phase timeout. RoomId: '{}', Generation: '{generation}', CurrentGeneration: '{}'.",
                        self.room.id(),
                        self.scheduler.generation()
                    );
                }
                None
            }
            RoomCommand::GetSnapshot {
                player_id,
                response_tx,
            } => {
                let result = if self
                    .room
                    .players()
                    .iter()
                    .any(|player| player.id == player_id)
                {
                    Ok(RoomResponse::Snapshot {
                        view: self.snapshot().view_for(&player_id),
                    })
                } else {
                    Err(Error::Domain(DomainError::PlayerNotFound(player_id)))
                };
                Some((result, response_tx))
            }
            RoomCommand::GetStats { response_tx } => Some((
                Ok(RoomResponse::Stats {
                    stats: self.room.stats(),
                }),
                response_tx,
            )),
            RoomCommand::Close { response_tx } => {
                // Handled by the mailbox loop
                Some((Ok(RoomResponse::Ok), response_tx))
            }
        };

        // Side effects go first so the broadcast state carries the new deadline
        let events = self.room.take_events();
        let state_changed = !events.is_empty();
        self.apply_events(events);

        if let Some((result, response_tx)) = response {
            let response = match result {
                Ok(response) => response,
                Err(error) => RoomResponse::Error { error },
            };
            if let Err(response) = response_tx.send(response) {
                log::error!("Sent a RoomResponse but the response channel is closed. RoomId: '{}', Response: '{response}'.", self.room.id());
            }
        }

        if state_changed {
            self.send_room_state();
        }
    }

    fn apply_events(&mut self, events: Vec<RoomEvent>) {
        for event in events {
            match event {
                RoomEvent::PhaseChanged(phase) => {
                    match self.room.settings().phase_timeout(&phase) {
                        Some(timeout) => self.scheduler.arm(timeout, self.room_tx.clone()),
                        None => self.scheduler.cancel(),
                    }
                }
                RoomEvent::RoundScored(results) => {
                    self.exporter.export_results(self.room.id(), results)
                }
                RoomEvent::RosterChanged(active_players) => self
                    .exporter
                    .export_room_status(self.room.id(), active_players),
            }
        }
    }

    /// Clients get a deadline slightly ahead of the real one, so their countdown ends first.
    fn client_deadline(&self) -> Option<DateTime<Utc>> {
        self.scheduler
            .deadline()
            .map(|deadline| deadline - self.deadline_lead)
    }

    fn snapshot(&self) -> RoomSnapshot {
        self.room.snapshot(self.client_deadline())
    }

    fn send_room_state(&self) {
        // No receivers just means nobody is connected
        let _ = self
            .broadcast_tx
            .send(RoomWideEvent::RoomState(Arc::new(self.snapshot())));
    }

    async fn stop_room(&self) {
        let room_id = self.room.id();
        if let Err(error) = self.room_factory.remove_room(room_id).await {
            log::error!("The RoomFactory channel is closed, can't remove the Room. RoomId: '{room_id}', Error: '{error}'.");
        }
    }
}

pub(crate) enum RoomCommand {
    AddPlayer {
        player_id: String,
        nickname: String,
        response_tx: OneshotSender<RoomResponse>,
    },
    RemovePlayer {
        player_id: String,
    },
    KickPlayer {
        player_id: String,
        response_tx: OneshotSender<RoomResponse>,
    },
    SubmitWords {
        player_id: String,
        words: Words,
    },
    SubmitVotes {
        player_id: String,
        votes: PlayerVotes,
    },
    Advance {
        response_tx: OneshotSender<RoomResponse>,
    },
    Start {
        response_tx: OneshotSender<RoomResponse>,
    },
    Restart {
        response_tx: OneshotSender<RoomResponse>,
    },
    End {
        response_tx: OneshotSender<RoomResponse>,
    },
    PhaseTimeout {
        generation: u64,
    },
    GetSnapshot {
        player_id: String,
        response_tx: OneshotSender<RoomResponse>,
    },
    GetStats {
        response_tx: OneshotSender<RoomResponse>,
    },
    Close {
        response_tx: OneshotSender<RoomResponse>,
    },
}

#[derive(Debug)]
pub(crate) enum RoomResponse {
    PlayerAdded {
        broadcast_rx: broadcast::Receiver<RoomWideEvent>,
    },
    Snapshot {
        view: PlayerView,
    },
    Stats {
        stats: RoomStats,
    },
    Ok,
    Error {
        error: Error,
    },
}

impl Display for RoomResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                RoomResponse::PlayerAdded { .. } => "RoomResponse::PlayerAdded".to_string(),
                RoomResponse::Snapshot { .. } => "RoomResponse::Snapshot".to_string(),
                RoomResponse::Stats { .. } => "RoomResponse::Stats".to_string(),
                RoomResponse::Ok => "RoomResponse::Ok".to_string(),
                RoomResponse::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}

#[derive(Clone, Debug)]
pub enum RoomWideEvent {
    RoomState(Arc<RoomSnapshot>),
    PlayerKicked { player_id: String },
    RoomClosed,
}
