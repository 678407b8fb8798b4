pub mod actor;
pub mod actor_client;
pub mod phase_fsm;
pub mod scheduler;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_fsm::StateMachine;
use serde::Serialize;

use crate::config::{AdhocCategoryPolicy, RoomSettings};
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::metrics::ROUNDS_SCORED;
use crate::player::Player;
use crate::round::category_store::{Candidates, CategoryStore};
use crate::round::scoring;
use crate::round::vote_tally::{PlayerVotes, VoteTally};
use crate::round::{LetterDrawer, Round};

use self::phase_fsm::{Phase, PhaseFsm, PhaseFsmInput};

/// A player's submission: `category -> word`.
pub type Words = HashMap<String, String>;

/// Side effects of a command, drained by the room actor once the command has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    PhaseChanged(Phase),
    /// Round totals keyed by nickname.
    RoundScored(BTreeMap<String, u32>),
    /// Ids of the connected players.
    RosterChanged(Vec<String>),
}

pub struct Room {
    id: String,
    settings: RoomSettings,
    fsm: StateMachine<PhaseFsm>,
    players: Vec<Player>,
    // Everyone who played in the current round, including players who already left
    nicknames: HashMap<String, String>,
    letters: LetterDrawer,
    round: Option<Round>,
    store: CategoryStore,
    tally: VoteTally,
    candidates: Candidates,
    results: BTreeMap<String, PlayerResults>,
    round_exported: bool,
    rounds_played: u32,
    most_players: usize,
    events: Vec<RoomEvent>,
}

impl Room {
    pub fn new(id: &str, settings: RoomSettings, letters: LetterDrawer) -> Self {
        Room {
            id: id.to_string(),
            settings,
            fsm: StateMachine::new(),
            players: Vec::default(),
            nicknames: HashMap::default(),
            letters,
            round: None,
            store: CategoryStore::default(),
            tally: VoteTally::default(),
            candidates: Candidates::default(),
            results: BTreeMap::default(),
            round_exported: false,
            rounds_played: 0,
            most_players: 0,
            events: Vec::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> &Phase {
        self.fsm.state()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<RoomEvent> {
        std::mem::take(&mut self.events)
    }

    fn get_player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }

    pub fn add_player(&mut self, player_id: &str, nickname: &str) -> Result<(), Error> {
        if self.get_player(player_id).is_some() {
            return Err(Error::Domain(DomainError::PlayerIdInUse(
                player_id.to_string(),
            )));
        }
        if self.nickname_in_use(player_id, nickname) {
            return Err(Error::Domain(DomainError::NicknameInUse(
                nickname.to_string(),
            )));
        }
        if self.players.len() >= self.settings.maximum_players {
            return Err(Error::Domain(DomainError::RoomIsFull(
                self.id.to_string(),
                self.settings.maximum_players,
            )));
        }
        if self.phase() != &Phase::Lobby && !self.settings.allow_late_join {
            return Err(Error::Domain(DomainError::RoomAlreadyStarted(
                self.id.to_string(),
            )));
        }

        self.players.push(Player::new(player_id, nickname));
        self.nicknames
            .insert(player_id.to_string(), nickname.to_string());
        self.most_players = self.most_players.max(self.players.len());
        self.roster_changed();

        if self.phase() == &Phase::Lobby && self.players.len() >= self.settings.minimum_players {
            log::info!(
                "Enough players joined, starting the game. RoomId: '{}', Players: '{}'.",
                self.id,
                self.players.len()
            );
            self.process_event(&PhaseFsmInput::Start)?;
        }
        Ok(())
    }

    /// Results are keyed by nickname, so it must stay unique among the connected players and the
    /// players of the current round, including those who already left.
    fn nickname_in_use(&self, player_id: &str, nickname: &str) -> bool {
        self.players
            .iter()
            .any(|player| player.nickname == nickname)
            || (self.round.is_some()
                && self
                    .nicknames
                    .iter()
                    .any(|(id, taken)| taken == nickname && id != player_id))
    }

    pub fn remove_player(&mut self, player_id: &str) -> Result<(), Error> {
        let index = self
            .players
            .iter()
            .position(|player| player.id == player_id)
            .ok_or_else(|| Error::Domain(DomainError::PlayerNotFound(player_id.to_string())))?;
        self.players.remove(index);
        self.roster_changed();

        if self.players.len() <= 1 && self.phase() != &Phase::Lobby {
            log::info!(
                "Not enough players left, ending the game. RoomId: '{}', Players: '{}'.",
                self.id,
                self.players.len()
            );
            self.process_event(&PhaseFsmInput::End)?;
        }
        Ok(())
    }

    fn roster_changed(&mut self) {
        self.events.push(RoomEvent::RosterChanged(
            self.players.iter().map(|player| player.id.clone()).collect(),
        ));
    }

    fn ensure_phase(&self, expected: Phase, operation: &str) -> Result<(), Error> {
        if self.phase() == &expected {
            Ok(())
        } else {
            Err(Error::Domain(DomainError::InvalidPhaseOperation {
                operation: operation.to_string(),
                phase: self.phase().clone(),
            }))
        }
    }

    fn ensure_player(&self, player_id: &str) -> Result<(), Error> {
        match self.get_player(player_id) {
            Some(_) => Ok(()),
            None => Err(Error::Domain(DomainError::PlayerNotFound(
                player_id.to_string(),
            ))),
        }
    }

    pub fn submit_words(&mut self, player_id: &str, words: Words) -> Result<(), Error> {
        self.ensure_phase(Phase::Completing, "submit_words")?;
        self.ensure_player(player_id)?;

        let round = self.round.as_ref().ok_or_else(|| {
            Error::log_and_create_internal(&format!(
                "Room is completing without a round. RoomId: '{}'.",
                self.id
            ))
        })?;
        for (category, word) in words {
            if round.has_category(&category)
                || self.settings.adhoc_categories == AdhocCategoryPolicy::Accept
            {
                self.store.upsert(&category, player_id, &word);
            } else {
                log::debug!(
                    "Dropped a word for an unknown category. RoomId: '{}', PlayerId: '{player_id}', Category: '{category}'.",
                    self.id
                );
            }
        }
        Ok(())
    }

    pub fn submit_votes(&mut self, player_id: &str, votes: PlayerVotes) -> Result<(), Error> {
        self.ensure_phase(Phase::Voting, "submit_votes")?;
        self.ensure_player(player_id)?;
        self.tally.record(player_id, votes);
        Ok(())
    }

    /// Moves one phase forward, the same step a scheduler expiry takes.
    pub fn advance(&mut self) -> Result<(), Error> {
        let input = match self.phase() {
            Phase::Lobby => PhaseFsmInput::Start,
            Phase::Completing | Phase::Voting => PhaseFsmInput::Advance,
            Phase::ScoreDisplay => {
                if self.players.len() >= self.settings.minimum_players {
                    PhaseFsmInput::Restart
                } else {
                    PhaseFsmInput::End
                }
            }
        };
        self.process_event(&input)
    }

    pub fn start(&mut self) -> Result<(), Error> {
        self.process_event(&PhaseFsmInput::Start)
    }

    pub fn restart(&mut self) -> Result<(), Error> {
        self.process_event(&PhaseFsmInput::Restart)
    }

    pub fn end(&mut self) -> Result<(), Error> {
        self.process_event(&PhaseFsmInput::End)
    }

    fn process_event(&mut self, input: &PhaseFsmInput) -> Result<(), Error> {
        let previous = self.phase().clone();
        if let Err(error) = self.fsm.consume(input) {
            log::info!(
                "Rejected a phase transition. RoomId: '{}', Phase: '{previous}', Command: '{input}', Error: '{error:?}'.",
                self.id
            );
            return Err(Error::Domain(DomainError::InvalidPhaseTransition(
                previous,
                input.to_string(),
            )));
        }

        match self.phase().clone() {
            Phase::Completing => self.start_new_round(),
            Phase::Voting => self.close_submissions(),
            Phase::ScoreDisplay => self.score_round(),
            Phase::Lobby => self.close_round(),
        }

        log::info!(
            "Room changed phase. RoomId: '{}', From: '{previous}', To: '{}', Command: '{input}'.",
            self.id,
            self.phase()
        );
        self.events.push(RoomEvent::PhaseChanged(self.phase().clone()));
        Ok(())
    }

    fn start_new_round(&mut self) {
        self.export_round();

        let round = Round::new(self.settings.categories.clone(), &mut self.letters);
        log::info!(
            "New round. RoomId: '{}', Letter: '{}'.",
            self.id,
            round.letter()
        );
        self.store = CategoryStore::with_placeholders(round.categories());
        self.tally = VoteTally::default();
        self.candidates = Candidates::default();
        self.results = BTreeMap::default();
        self.nicknames = self
            .players
            .iter()
            .map(|player| (player.id.clone(), player.nickname.clone()))
            .collect();
        self.round = Some(round);
        self.round_exported = false;
        self.rounds_played += 1;
    }

    fn close_submissions(&mut self) {
        let categories = self
            .round
            .as_ref()
            .map(|round| round.categories().to_vec())
            .unwrap_or_default();
        log::info!(
            "Submissions closed. RoomId: '{}', Summary: '{:?}'.",
            self.id,
            self.store.completing_summary(&categories)
        );
        self.candidates = self.store.voting_candidates();
    }

    fn score_round(&mut self) {
        let letter = match &self.round {
            Some(round) => round.letter(),
            None => {
                log::error!("Room is scoring without a round. RoomId: '{}'.", self.id);
                return;
            }
        };

        self.store.remove_placeholders();
        self.tally.apply(self.store.entries_mut());
        scoring::score_entries(self.store.entries_mut(), letter);
        self.results = self.score_board();
        ROUNDS_SCORED.inc();
        log::info!(
            "Round scored. RoomId: '{}', Voters: '{}', Entries: '{}'.",
            self.id,
            self.tally.voters(),
            self.store.entries().len()
        );
        self.export_round();
    }

    fn close_round(&mut self) {
        self.export_round();
        self.round = None;
        self.store = CategoryStore::default();
        self.tally = VoteTally::default();
        self.candidates = Candidates::default();
        self.results = BTreeMap::default();
    }

    /// Queues the round totals for export, once per round.
    fn export_round(&mut self) {
        if self.round.is_none() || self.round_exported {
            return;
        }
        let totals: BTreeMap<String, u32> = scoring::player_totals(self.store.entries())
            .into_iter()
            .map(|(player_id, score)| (self.nickname(&player_id), score))
            .collect();
        self.round_exported = true;
        self.events.push(RoomEvent::RoundScored(totals));
    }

    fn nickname(&self, player_id: &str) -> String {
        self.nicknames
            .get(player_id)
            .cloned()
            .unwrap_or_else(|| player_id.to_string())
    }

    fn score_board(&self) -> BTreeMap<String, PlayerResults> {
        self.store
            .by_player()
            .into_iter()
            .map(|(player_id, entries)| {
                let results: Vec<EntryResult> = entries
                    .iter()
                    .map(|entry| EntryResult {
                        category_name: entry.category_name.clone(),
                        word: entry.word.clone(),
                        score: entry.score,
                    })
                    .collect();
                (
                    self.nickname(&player_id),
                    PlayerResults {
                        score: results.iter().map(|result| result.score).sum(),
                        results,
                    },
                )
            })
            .collect()
    }

    fn phase_data(&self) -> PhaseData {
        match (self.phase(), &self.round) {
            (Phase::Completing, Some(round)) => PhaseData::Completing {
                categories: round.categories().to_vec(),
                letter: round.letter(),
            },
            (Phase::Voting, _) => PhaseData::Voting {
                candidates: self.candidates.clone(),
            },
            (Phase::ScoreDisplay, _) => PhaseData::ScoreDisplay {
                results: self.results.clone(),
            },
            _ => PhaseData::Lobby {},
        }
    }

    pub fn snapshot(&self, deadline: Option<DateTime<Utc>>) -> RoomSnapshot {
        RoomSnapshot {
            phase: self.phase().clone(),
            players: self.players.clone(),
            deadline,
            phase_data: self.phase_data(),
        }
    }

    pub fn stats(&self) -> RoomStats {
        RoomStats {
            room_id: self.id.clone(),
            phase: self.phase().as_wire_str(),
            maximum_players: self.settings.maximum_players,
            connected_players: self.players.len(),
            player_ids: self.players.iter().map(|player| player.id.clone()).collect(),
            most_players: self.most_players,
            rounds_played: self.rounds_played,
            letter: self.round.as_ref().map(|round| round.letter()),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryResult {
    pub category_name: String,
    pub word: String,
    pub score: u32,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResults {
    pub score: u32,
    pub results: Vec<EntryResult>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum PhaseData {
    Lobby {},
    Completing {
        categories: Vec<String>,
        letter: char,
    },
    Voting {
        candidates: Candidates,
    },
    /// Keyed by nickname.
    ScoreDisplay {
        results: BTreeMap<String, PlayerResults>,
    },
}

/// The room state shared by every player after a command.
#[derive(Clone, Debug)]
pub struct RoomSnapshot {
    pub phase: Phase,
    pub players: Vec<Player>,
    pub deadline: Option<DateTime<Utc>>,
    pub phase_data: PhaseData,
}

impl RoomSnapshot {
    pub fn view_for(&self, player_id: &str) -> PlayerView {
        PlayerView {
            phase: self.phase.as_wire_str(),
            other_players: self
                .players
                .iter()
                .filter(|player| player.id != player_id)
                .map(|player| player.nickname.clone())
                .collect(),
            deadline: self.deadline,
            phase_data: self.phase_data.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub phase: &'static str,
    pub other_players: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub phase_data: PhaseData,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomStats {
    pub room_id: String,
    pub phase: &'static str,
    pub maximum_players: usize,
    pub connected_players: usize,
    pub player_ids: Vec<String>,
    pub most_players: usize,
    pub rounds_played: u32,
    pub letter: Option<char>,
}
