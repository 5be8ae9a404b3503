use serde::{Deserialize, Serialize};

/// A single guessing card: the word to explain and the terms that may not be
/// spoken while explaining it. Immutable once drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub word: String,
    pub forbidden: Vec<String>,
}

impl Card {
    pub fn new(word: &str, forbidden: &[&str]) -> Self {
        Card {
            word: word.to_string(),
            forbidden: forbidden.iter().map(|w| w.to_string()).collect(),
        }
    }
}
