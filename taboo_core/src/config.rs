use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A participating team. Identity is stable for the whole game; the name may
/// only be edited before the game starts. Teams never carry a score field,
/// the ledger is the sole authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
}

impl Team {
    pub fn new(id: u32, name: &str) -> Self {
        Team {
            id,
            name: name.to_string(),
        }
    }
}

/// The settings carried from setup into play. Immutable for the lifetime of
/// one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfiguration {
    pub teams: Vec<Team>,
    pub seconds_per_round: u32,
    pub target_score: i32,
    pub passes_per_round: u32,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a game needs at least two teams, got {0}")]
    NotEnoughTeams(usize),
    #[error("seconds per round must be greater than zero")]
    ZeroSecondsPerRound,
    #[error("target score must be greater than zero, got {0}")]
    NonPositiveTarget(i32),
}

impl GameConfiguration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.teams.len() < 2 {
            return Err(ConfigError::NotEnoughTeams(self.teams.len()));
        }
        if self.seconds_per_round == 0 {
            return Err(ConfigError::ZeroSecondsPerRound);
        }
        if self.target_score <= 0 {
            return Err(ConfigError::NonPositiveTarget(self.target_score));
        }
        Ok(())
    }

    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.seconds_per_round))
    }
}
