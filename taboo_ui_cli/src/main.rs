use anyhow::Result;
use taboo_core::{run_game, GameConfiguration, StaticWordSource, Team};

use crate::console::ConsolePresenter;

mod console;

fn main() -> Result<()> {
    env_logger::init();

    let mut names: Vec<String> = std::env::args().skip(1).collect();
    if names.len() < 2 {
        names = vec!["Reds".to_string(), "Blues".to_string()];
    }
    let config = GameConfiguration {
        teams: names
            .iter()
            .enumerate()
            .map(|(i, name)| Team::new(i as u32 + 1, name))
            .collect(),
        seconds_per_round: 60,
        target_score: 30,
        passes_per_round: 3,
    };

    let mut source = StaticWordSource::builtin();
    let mut presenter = ConsolePresenter::new();
    let winners = run_game(config, &mut source, &mut presenter)?;
    if winners.is_empty() {
        println!("Game over, no winner declared.");
    }
    Ok(())
}
