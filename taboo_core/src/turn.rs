use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    card::Card,
    deck::WordDeck,
    error::GameError,
    ledger::ScoreLedger,
    timer::{TimerSignal, TimerState, TurnTimer},
};

/// Per-turn counters. Created fresh for every turn and discarded once the
/// turn is committed; never reused across turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTally {
    pub correct: u32,
    pub incorrect: u32,
}

impl RoundTally {
    pub fn net_score(&self) -> i32 {
        self.correct as i32 - self.incorrect as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    NotStarted,
    Active,
    Ended,
}

/// Orchestrates one team's timed turn: tallies outcomes, enforces the pass
/// budget and commits the net score to the ledger exactly once, at turn end.
/// Mid-turn nothing is written to the ledger, so no other component can act
/// on a provisional score.
#[derive(Debug)]
pub struct TurnController {
    team_index: usize,
    round_number: usize,
    tally: RoundTally,
    passes_remaining: u32,
    current_card: Option<Card>,
    timer: TurnTimer,
    phase: TurnPhase,
}

impl TurnController {
    pub fn new(team_index: usize, round_number: usize, pass_budget: u32) -> Self {
        TurnController {
            team_index,
            round_number,
            tally: RoundTally::default(),
            passes_remaining: pass_budget,
            current_card: None,
            timer: TurnTimer::new(),
            phase: TurnPhase::NotStarted,
        }
    }

    pub fn begin_turn(&mut self, deck: &mut WordDeck, duration: Duration) -> Result<(), GameError> {
        if self.phase != TurnPhase::NotStarted {
            return Err(GameError::InvalidTurnOperation("turn has already begun"));
        }
        let card = deck.draw()?;
        self.current_card = Some(card);
        self.tally = RoundTally::default();
        self.timer.start(duration);
        self.phase = TurnPhase::Active;
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.phase != TurnPhase::Active {
            return Err(GameError::InvalidTurnOperation("turn is not active"));
        }
        if self.timer.is_expired() {
            return Err(GameError::InvalidTurnOperation("time is up"));
        }
        Ok(())
    }

    pub fn mark_correct(&mut self, deck: &mut WordDeck) -> Result<(), GameError> {
        self.ensure_active()?;
        self.tally.correct += 1;
        self.current_card = Some(deck.draw()?);
        Ok(())
    }

    pub fn mark_incorrect(&mut self, deck: &mut WordDeck) -> Result<(), GameError> {
        self.ensure_active()?;
        self.tally.incorrect += 1;
        self.current_card = Some(deck.draw()?);
        Ok(())
    }

    /// Skips the current card if the pass budget allows it. An exhausted
    /// budget rejects the call without touching the tally.
    pub fn mark_pass(&mut self, deck: &mut WordDeck) -> Result<(), GameError> {
        self.ensure_active()?;
        if self.passes_remaining == 0 {
            return Err(GameError::InvalidTurnOperation("pass budget exhausted"));
        }
        self.passes_remaining -= 1;
        self.current_card = Some(deck.draw()?);
        Ok(())
    }

    pub fn pause(&mut self) {
        self.timer.pause();
    }

    pub fn resume(&mut self) {
        self.timer.resume();
    }

    pub fn tick(&mut self, elapsed: Duration) -> Option<TimerSignal> {
        self.timer.tick(elapsed)
    }

    /// The single commit point. Stops the timer, folds `correct - incorrect`
    /// into the ledger and seals the turn; a repeated call is a
    /// `DoubleCommit` and leaves the ledger untouched.
    pub fn end_turn(&mut self, ledger: &mut ScoreLedger) -> Result<i32, GameError> {
        match self.phase {
            TurnPhase::Ended => Err(GameError::DoubleCommit),
            TurnPhase::NotStarted => Err(GameError::InvalidTurnOperation("turn never started")),
            TurnPhase::Active => {
                self.timer.abort();
                let total =
                    ledger.commit_turn(self.team_index, self.round_number, self.tally.net_score());
                self.phase = TurnPhase::Ended;
                Ok(total)
            }
        }
    }

    /// Abandons the turn without committing the partial tally. Used when the
    /// whole game is cancelled mid-turn.
    pub fn abandon(&mut self) {
        self.timer.abort();
        self.phase = TurnPhase::Ended;
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn team_index(&self) -> usize {
        self.team_index
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }

    pub fn tally(&self) -> RoundTally {
        self.tally
    }

    pub fn passes_remaining(&self) -> u32 {
        self.passes_remaining
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_card.as_ref()
    }

    pub fn remaining_time(&self) -> Duration {
        self.timer.remaining()
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }
}
