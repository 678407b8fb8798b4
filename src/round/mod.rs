pub mod category_store;
pub mod scoring;
pub mod vote_tally;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// One play-through of the room's categories with a single drawn letter.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    categories: Vec<String>,
    letter: char,
}

impl Round {
    pub fn new(categories: Vec<String>, letters: &mut LetterDrawer) -> Self {
        Round {
            categories,
            letter: letters.draw(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn has_category(&self, category_name: &str) -> bool {
        self.categories.iter().any(|name| name == category_name)
    }
}

/// Draws round letters, never the same one twice in a row.
pub struct LetterDrawer {
    rng: StdRng,
    alphabet: Vec<char>,
    last_letter: Option<char>,
}

impl LetterDrawer {
    // Letters with too few words to play with
    const EXCLUDED_LETTERS: [char; 4] = ['q', 'v', 'x', 'y'];

    pub fn from_entropy() -> Self {
        LetterDrawer::new(StdRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        LetterDrawer::new(StdRng::seed_from_u64(seed))
    }

    pub fn new(rng: StdRng) -> Self {
        LetterDrawer {
            rng,
            alphabet: ('a'..='z')
                .filter(|letter| !LetterDrawer::EXCLUDED_LETTERS.contains(letter))
                .collect(),
            last_letter: None,
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn draw(&mut self) -> char {
        let candidates: Vec<char> = self
            .alphabet
            .iter()
            .copied()
            .filter(|letter| Some(*letter) != self.last_letter)
            .collect();
        // The alphabet always has more than one letter, so there is always a candidate
        let letter = *candidates
            .choose(&mut self.rng)
            .unwrap_or(&self.alphabet[0]);
        self.last_letter = Some(letter);
        letter
    }
}
