use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{card::Card, error::EmptyDeckError};

/// The pool of cards for a game, drawn cyclically. When the cursor runs past
/// the end the same pool is reshuffled and drawing continues from the top of
/// the new order. An immediate repeat at the seam is possible.
#[derive(Debug, Clone)]
pub struct WordDeck {
    cards: Vec<Card>,
    cursor: usize,
    rng: StdRng,
}

impl WordDeck {
    pub fn new() -> Self {
        WordDeck {
            cards: vec![],
            cursor: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic deck for tests.
    pub fn with_seed(seed: u64) -> Self {
        WordDeck {
            cards: vec![],
            cursor: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replaces the pool and resets the cursor. An empty `cards` leaves the
    /// deck in its explicit empty state.
    pub fn load(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.cursor = 0;
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn draw(&mut self) -> Result<Card, EmptyDeckError> {
        if self.cards.is_empty() {
            return Err(EmptyDeckError);
        }
        if self.cursor >= self.cards.len() {
            self.cards.shuffle(&mut self.rng);
            self.cursor = 0;
        }
        let card = self.cards[self.cursor].clone();
        self.cursor += 1;
        Ok(card)
    }
}

impl Default for WordDeck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_cards() -> Vec<Card> {
        ["alpha", "bravo", "charlie", "delta", "echo"]
            .iter()
            .map(|w| Card::new(w, &["one", "two", "three"]))
            .collect()
    }

    #[test]
    fn draw_on_empty_deck_should_fail() {
        let mut deck = WordDeck::with_seed(1);
        assert_eq!(deck.draw(), Err(EmptyDeckError));

        deck.load(vec![]);
        assert_eq!(deck.draw(), Err(EmptyDeckError));
    }

    #[test]
    fn load_should_reset_cursor() {
        let mut deck = WordDeck::with_seed(1);
        deck.load(five_cards());
        deck.draw().unwrap();
        deck.draw().unwrap();
        assert_eq!(deck.cursor(), 2);

        deck.load(five_cards());
        assert_eq!(deck.cursor(), 0);
    }

    #[test]
    fn deck_should_reshuffle_and_wrap_after_exhaustion() {
        let mut deck = WordDeck::with_seed(7);
        deck.load(five_cards());

        for _ in 0..5 {
            deck.draw().unwrap();
        }
        assert_eq!(deck.cursor(), 5);

        // 6th and 7th draws come from a freshly shuffled full pool
        deck.draw().unwrap();
        assert_eq!(deck.len(), 5);
        assert_eq!(deck.cursor(), 1);
        deck.draw().unwrap();
        assert_eq!(deck.cursor(), 2);
    }

    #[test]
    fn wrapped_pool_should_contain_the_same_cards() {
        let mut deck = WordDeck::with_seed(3);
        let mut expected: Vec<String> = five_cards().into_iter().map(|c| c.word).collect();
        deck.load(five_cards());

        let mut first_pass: Vec<String> = (0..5).map(|_| deck.draw().unwrap().word).collect();
        let mut second_pass: Vec<String> = (0..5).map(|_| deck.draw().unwrap().word).collect();

        expected.sort();
        first_pass.sort();
        second_pass.sort();
        assert_eq!(first_pass, expected);
        assert_eq!(second_pass, expected);
    }
}
