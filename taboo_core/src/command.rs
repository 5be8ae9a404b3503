use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Commands a presentation layer can issue against a running game. `Tick`
/// carries the wall time the presenter measured since its last command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    BeginTurn,
    MarkCorrect,
    MarkIncorrect,
    MarkPass,
    Pause,
    Resume,
    Tick(Duration),
    EndTurnEarly,
    AdvanceToNextTeam,
    ForceEndGame,
}
