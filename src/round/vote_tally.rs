use std::collections::HashMap;

use serde_json::Value;

use crate::error::domain_error::DomainError;
use crate::round::category_store::Entry;

/// The raw vote payload of one player: `category -> { word -> legit }`.
///
/// Values are kept as JSON so that one malformed vote does not invalidate the whole message.
pub type PlayerVotes = HashMap<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    votes_by_player: HashMap<String, PlayerVotes>,
}

impl VoteTally {
    /// Replaces everything the player voted before.
    pub fn record(&mut self, player_id: &str, votes: PlayerVotes) {
        self.votes_by_player.insert(player_id.to_string(), votes);
    }

    pub fn voters(&self) -> usize {
        self.votes_by_player.len()
    }

    /// Algebraic sum of the votes cast on each `(category, word)`.
    pub fn net_votes(&self) -> HashMap<(String, String), i32> {
        let mut net_votes: HashMap<(String, String), i32> = HashMap::new();
        for (player_id, votes) in &self.votes_by_player {
            for (category, words) in votes {
                let words = match words.as_object() {
                    Some(words) => words,
                    None => {
                        log_skipped_vote(DomainError::MalformedVotePayload {
                            player_id: player_id.to_string(),
                            category: category.to_string(),
                            reason: format!("expected an object of words, got '{words}'"),
                        });
                        continue;
                    }
                };
                for (word, vote) in words {
                    match vote.as_bool() {
                        Some(is_legit) => {
                            *net_votes
                                .entry((category.to_string(), word.to_string()))
                                .or_insert(0) += if is_legit { 1 } else { -1 };
                        }
                        None => log_skipped_vote(DomainError::MalformedVotePayload {
                            player_id: player_id.to_string(),
                            category: category.to_string(),
                            reason: format!("expected a boolean for word '{word}', got '{vote}'"),
                        }),
                    }
                }
            }
        }
        net_votes
    }

    /// Adds the net votes to every entry sharing the voted category and word.
    pub fn apply(&self, entries: &mut [Entry]) {
        let net_votes = self.net_votes();
        for entry in entries.iter_mut() {
            if let Some(votes) =
                net_votes.get(&(entry.category_name.to_string(), entry.word.to_string()))
            {
                entry.net_legit_votes += votes;
            }
        }
    }
}

fn log_skipped_vote(error: DomainError) {
    log::warn!("{error}");
}
