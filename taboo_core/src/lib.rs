pub mod card;
pub mod command;
pub mod config;
pub mod deck;
pub mod error;
pub mod event;
pub mod game;
pub mod ledger;
pub mod presenter;
pub mod source;
pub mod timer;
pub mod turn;

pub use card::Card;
pub use command::Command;
pub use config::{GameConfiguration, Team};
pub use error::GameError;
pub use event::{FeedbackSink, GameEvent};
pub use game::{GameCoordinator, GamePhase, GameSnapshot, StandingsRow};
pub use presenter::Presenter;
pub use source::{StaticWordSource, WordSource};

/// How many cards a game asks the word source for up front.
pub const DEFAULT_FETCH_LIMIT: usize = 64;

/// Drives one game from setup to the end: fills the deck, then loops
/// obtaining commands from the presenter until the game is over. Invalid
/// commands are rejected and logged without corrupting state; deck, source
/// and configuration failures propagate. The final standings are handed to
/// the presenter before returning the winner indices (empty if the game was
/// abandoned).
pub fn run_game<S, P>(
    config: GameConfiguration,
    source: &mut S,
    presenter: &mut P,
) -> Result<Vec<usize>, GameError>
where
    S: WordSource,
    P: Presenter,
{
    let mut game = GameCoordinator::new(config)?;
    game.load_words(source, DEFAULT_FETCH_LIMIT)?;

    let mut delivered = 0;
    loop {
        for event in &game.events()[delivered..] {
            presenter.notify(event);
        }
        delivered = game.events().len();
        if game.phase() == GamePhase::GameEnded {
            break;
        }

        let result = match presenter.obtain_command(&game.snapshot()) {
            Command::BeginTurn => game.begin_turn(),
            Command::MarkCorrect => game.mark_correct(),
            Command::MarkIncorrect => game.mark_incorrect(),
            Command::MarkPass => game.mark_pass(),
            Command::Pause => game.pause(),
            Command::Resume => game.resume(),
            Command::Tick(elapsed) => game.tick(elapsed),
            Command::EndTurnEarly => game.end_turn_early(),
            Command::AdvanceToNextTeam => game.advance_to_next_team(),
            Command::ForceEndGame => game.force_end_game(),
        };
        if let Err(err) = result {
            match err {
                GameError::InvalidTurnOperation(_)
                | GameError::InvalidPhase(_)
                | GameError::DoubleCommit => {
                    log::warn!("rejected command: {err}");
                }
                fatal => return Err(fatal),
            }
        }
    }

    presenter.game_over(&game.standings(), game.winners());
    Ok(game.winners().to_vec())
}
