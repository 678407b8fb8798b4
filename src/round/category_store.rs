use std::collections::BTreeMap;
use std::ops::Index;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One player's word for one category in the current round.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    pub category_name: String,
    pub word: String,
    /// None for the placeholder rows that only carry a category label.
    pub player_id: Option<String>,
    pub net_legit_votes: i32,
    pub is_legit: bool,
    pub is_unique: bool,
    pub is_only_legit_in_category: bool,
    pub score: u32,
}

impl Entry {
    pub fn placeholder(category_name: &str) -> Self {
        Entry {
            category_name: category_name.to_string(),
            ..Entry::default()
        }
    }

    pub fn new(category_name: &str, word: &str, player_id: &str) -> Self {
        Entry {
            category_name: category_name.to_string(),
            word: normalize_word(word),
            player_id: Some(player_id.to_string()),
            ..Entry::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.player_id.is_none()
    }
}

/// Trims whitespace and zero-width spaces around the word and lower-cases it.
pub fn normalize_word(word: &str) -> String {
    word.trim_matches(|char: char| char.is_whitespace() || char == '\u{200b}')
        .to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    entries: Vec<Entry>,
}

impl CategoryStore {
    pub fn with_placeholders(categories: &[String]) -> Self {
        CategoryStore {
            entries: categories
                .iter()
                .map(|category| Entry::placeholder(category))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    /// Records a player's word, replacing the previous one for the same category.
    pub fn upsert(&mut self, category_name: &str, player_id: &str, word: &str) {
        let word = normalize_word(word);
        match self.entries.iter_mut().find(|entry| {
            entry.category_name == category_name && entry.player_id.as_deref() == Some(player_id)
        }) {
            Some(entry) => entry.word = word,
            None => self.entries.push(Entry {
                word,
                ..Entry::new(category_name, "", player_id)
            }),
        }
    }

    pub fn remove_placeholders(&mut self) {
        self.entries.retain(|entry| !entry.is_placeholder());
    }

    pub fn filter_by_category(&self, category_name: &str) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.category_name == category_name)
            .collect()
    }

    /// Category names in first-seen order, ad-hoc ones included.
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.category_name) {
                names.push(entry.category_name.clone());
            }
        }
        names
    }

    /// Every category with its distinct non-empty words, in first-submitted order.
    ///
    /// Placeholders are seeded in round order, so configured categories come first and ad-hoc
    /// ones follow.
    pub fn voting_candidates(&self) -> Candidates {
        self.candidates_for(&self.category_names())
    }

    /// Distinct non-empty words for each of the given categories only.
    pub fn completing_summary(&self, categories: &[String]) -> Candidates {
        self.candidates_for(categories)
    }

    fn candidates_for(&self, categories: &[String]) -> Candidates {
        Candidates(
            categories
                .iter()
                .map(|category| (category.clone(), self.distinct_words(category)))
                .collect(),
        )
    }

    fn distinct_words(&self, category_name: &str) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        for entry in self.filter_by_category(category_name) {
            if !entry.word.is_empty() && !words.contains(&entry.word) {
                words.push(entry.word.clone());
            }
        }
        words
    }

    /// Submitted entries grouped by player, placeholders left out.
    pub fn by_player(&self) -> BTreeMap<String, Vec<&Entry>> {
        let mut players: BTreeMap<String, Vec<&Entry>> = BTreeMap::new();
        for entry in &self.entries {
            if let Some(player_id) = &entry.player_id {
                players.entry(player_id.clone()).or_default().push(entry);
            }
        }
        players
    }
}

/// Categories with their candidate words, serialized as a JSON object that keeps the round order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates(Vec<(String, Vec<String>)>);

impl Candidates {
    pub fn get(&self, category_name: &str) -> Option<&Vec<String>> {
        self.0
            .iter()
            .find(|(name, _)| name == category_name)
            .map(|(_, words)| words)
    }

    pub fn contains_key(&self, category_name: &str) -> bool {
        self.get(category_name).is_some()
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.0.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<&str> for Candidates {
    type Output = Vec<String>;

    fn index(&self, category_name: &str) -> &Self::Output {
        match self.get(category_name) {
            Some(words) => words,
            None => panic!("No candidates for category '{category_name}'"),
        }
    }
}

impl Serialize for Candidates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category_name, words) in &self.0 {
            map.serialize_entry(category_name, words)?;
        }
        map.end()
    }
}
