use serde::{Deserialize, Serialize};

/// Discrete moments a feedback layer (sound, haptics) or presenter can react
/// to. Observers never influence state transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TurnStarted {
        team_index: usize,
        round_number: usize,
    },
    Correct {
        team_index: usize,
    },
    Incorrect {
        team_index: usize,
    },
    Pass {
        team_index: usize,
        passes_remaining: u32,
    },
    TurnCommitted {
        team_index: usize,
        round_number: usize,
        net_score: i32,
        total: i32,
    },
    GameWon {
        winners: Vec<usize>,
    },
}

/// Observer seam for the excluded feedback collaborators.
pub trait FeedbackSink {
    fn notify(&mut self, event: &GameEvent);
}
