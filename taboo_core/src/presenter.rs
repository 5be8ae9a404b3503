use crate::{
    command::Command,
    event::GameEvent,
    game::{GameSnapshot, StandingsRow},
};

/// The seam between the engine and a presentation layer. The engine pushes
/// every game event through `notify` and asks for the next command with a
/// read-only snapshot; presenters never touch live state. Once the game is
/// over the engine hands the final ranking to `game_over`, whether the game
/// was won or abandoned.
pub trait Presenter {
    fn notify(&mut self, event: &GameEvent);
    fn obtain_command(&mut self, snapshot: &GameSnapshot) -> Command;
    fn game_over(&mut self, standings: &[StandingsRow], winners: &[usize]);
}
