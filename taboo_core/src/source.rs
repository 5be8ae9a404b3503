use crate::{card::Card, error::WordSourceError};

/// Contract with the external word-list service. Fetching may fail; a failed
/// or empty fetch must surface as an error so the game never starts on a
/// silently empty deck.
pub trait WordSource {
    fn fetch_cards(&mut self, limit: usize) -> Result<Vec<Card>, WordSourceError>;
}

/// In-memory source backed by a fixed card list. Used as the bundled
/// fallback when no remote service is wired in.
pub struct StaticWordSource {
    cards: Vec<Card>,
}

impl StaticWordSource {
    pub fn new(cards: Vec<Card>) -> Self {
        StaticWordSource { cards }
    }

    /// The bundled starter deck.
    pub fn builtin() -> Self {
        let cards = vec![
            Card::new("Chocolate", &["Cocoa", "Sweet", "Dark", "Milk", "Candy"]),
            Card::new("Football", &["Ball", "Goal", "Keeper", "Match", "Kick"]),
            Card::new("Istanbul", &["Bosphorus", "Bridge", "Galata", "Turkey", "City"]),
            Card::new("Computer", &["Keyboard", "Mouse", "Screen", "Internet", "Laptop"]),
            Card::new("Cat", &["Meow", "Dog", "Tail", "Scratch", "Pet"]),
            Card::new("Book", &["Page", "Read", "Author", "Novel", "Library"]),
            Card::new("Sea", &["Beach", "Wave", "Water", "Blue", "Swim"]),
            Card::new("Telephone", &["Call", "Talk", "Mobile", "Smart", "Ring"]),
            Card::new("Cinema", &["Film", "Popcorn", "Ticket", "Screen", "Movie"]),
            Card::new("Pizza", &["Italian", "Cheese", "Dough", "Slice", "Oven"]),
            Card::new("Swimming", &["Pool", "Water", "Sea", "Stroke", "Dive"]),
            Card::new("Cross", &["Plus", "Sign", "Church", "Symbol", "Crucifix"]),
        ];
        StaticWordSource::new(cards)
    }
}

impl WordSource for StaticWordSource {
    fn fetch_cards(&mut self, limit: usize) -> Result<Vec<Card>, WordSourceError> {
        if self.cards.is_empty() {
            return Err(WordSourceError("the source has no cards".to_string()));
        }
        Ok(self.cards.iter().take(limit).cloned().collect())
    }
}
