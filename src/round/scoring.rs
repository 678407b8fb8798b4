use std::collections::BTreeMap;

use crate::round::category_store::Entry;

pub const ONLY_LEGIT_SCORE: u32 = 15;
pub const UNIQUE_SCORE: u32 = 10;
pub const SHARED_SCORE: u32 = 5;

/// Derives every flag and score of the round's entries.
///
/// Each flag is computed from the same snapshot of the entries, so the result does not depend on
/// the order of the entries. Placeholder rows must be removed before scoring.
pub fn score_entries(entries: &mut [Entry], letter: char) {
    let is_unique: Vec<bool> = entries
        .iter()
        .map(|entry| is_unique(entry, entries))
        .collect();
    let is_legit: Vec<bool> = entries
        .iter()
        .map(|entry| is_legit(entry, letter))
        .collect();
    let is_only_legit: Vec<bool> = entries
        .iter()
        .map(|entry| {
            !entries
                .iter()
                .zip(&is_legit)
                .any(|(other, legit)| *legit && is_competitor(entry, other))
        })
        .collect();

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.is_unique = is_unique[index];
        entry.is_legit = is_legit[index];
        entry.is_only_legit_in_category = is_only_legit[index];
        entry.score = score(entry);
    }
}

pub fn is_legit(entry: &Entry, letter: char) -> bool {
    entry.net_legit_votes >= 0 && entry.word.chars().next() == Some(letter)
}

fn is_unique(entry: &Entry, entries: &[Entry]) -> bool {
    !entries
        .iter()
        .any(|other| is_competitor(entry, other) && other.word == entry.word)
}

/// Another player's entry in the same category.
fn is_competitor(entry: &Entry, other: &Entry) -> bool {
    other.category_name == entry.category_name && other.player_id != entry.player_id
}

fn score(entry: &Entry) -> u32 {
    if entry.word.is_empty() || !entry.is_legit {
        0
    } else if entry.is_only_legit_in_category {
        ONLY_LEGIT_SCORE
    } else if entry.is_unique {
        UNIQUE_SCORE
    } else {
        SHARED_SCORE
    }
}

/// Sum of the entry scores of every player that submitted something.
pub fn player_totals(entries: &[Entry]) -> BTreeMap<String, u32> {
    let mut totals: BTreeMap<String, u32> = BTreeMap::new();
    for entry in entries {
        if let Some(player_id) = &entry.player_id {
            *totals.entry(player_id.clone()).or_insert(0) += entry.score;
        }
    }
    totals
}
