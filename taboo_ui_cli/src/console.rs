use std::{
    io::{self, BufRead, Write},
    str::FromStr,
    time::Instant,
};

use itertools::Itertools;
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};
use taboo_core::{
    game::{GameSnapshot, StandingsRow},
    timer::TimerState,
    Command, GameEvent, GamePhase, Presenter,
};

static RULES: &str = "
*** Taboo ***
Teams take timed turns explaining words to their teammates without using any
of the forbidden terms printed on the card. A correct guess is +1, slipping
up is -1, and a limited number of passes lets you skip a hopeless card. When
the clock runs out the turn's net score is added to the team total; the first
team to reach the target score at the end of its own turn wins.";

#[derive(Debug, PartialEq, Copy, Clone, Display, EnumIter, EnumString, EnumMessage)]
enum ConsoleCommand {
    #[strum(serialize = "c", message = "correct guess (+1)")]
    Correct,
    #[strum(serialize = "x", message = "forbidden word used (-1)")]
    Incorrect,
    #[strum(serialize = "p", message = "pass this card")]
    Pass,
    #[strum(serialize = "u", message = "pause the clock")]
    Pause,
    #[strum(serialize = "e", message = "end the turn now")]
    EndTurn,
    #[strum(serialize = "s", message = "show the scoreboard")]
    Scoreboard,
    #[strum(serialize = "r", message = "display rules")]
    Rules,
    #[strum(serialize = "q", message = "quit the game")]
    Quit,
}

fn format_standings(standings: &[StandingsRow], winners: &[usize]) -> Vec<String> {
    standings
        .iter()
        .enumerate()
        .map(|(rank, row)| {
            let marker = if winners.contains(&row.team_index) {
                "  * winner"
            } else {
                ""
            };
            format!("{:>2}. {:<14} {:>5}{}", rank + 1, row.team.name, row.total, marker)
        })
        .collect()
}

/// Terminal presenter. Measures the wall time the human spends on each
/// prompt and feeds it to the engine as ticks, so the countdown advances
/// even though the core never sleeps.
pub struct ConsolePresenter {
    team_names: Vec<String>,
    pending: Option<Command>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        ConsolePresenter {
            team_names: vec![],
            pending: None,
        }
    }

    fn team_name(&self, index: usize) -> String {
        self.team_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("team {}", index))
    }

    fn read_line(&self) -> String {
        print!("> ");
        io::stdout().flush().unwrap();
        io::stdin()
            .lock()
            .lines()
            .next()
            .and_then(|l| l.ok())
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn print_options(&self) {
        for cmd in ConsoleCommand::iter() {
            println!("- [{}]: {}", cmd, cmd.get_message().unwrap_or(""));
        }
    }

    fn render_card(&self, snapshot: &GameSnapshot) {
        let remaining = snapshot
            .remaining_time
            .map(|d| d.as_secs())
            .unwrap_or_default();
        println!("\n----------------------------------------");
        if let Some(card) = &snapshot.current_card {
            println!("  {}   ({}s left)", card.word.to_uppercase(), remaining);
            println!("  forbidden: {}", card.forbidden.iter().join(", "));
        }
        if let (Some(tally), Some(passes)) = (snapshot.tally, snapshot.passes_remaining) {
            println!(
                "  {} | net {:+} | {} passes left",
                self.team_name(snapshot.current_team_index),
                tally.net_score(),
                passes
            );
        }
        println!("----------------------------------------");
    }

    fn render_scoreboard(&self, snapshot: &GameSnapshot) {
        let round = snapshot.current_round_number;
        println!(
            "\nRound {} | target score {}",
            round, snapshot.target_score
        );
        println!(
            "{:<14} {:>6} {:>11} {:>7}",
            "Team", "Past", "This round", "Total"
        );
        for (i, entry) in snapshot.scores.iter().enumerate() {
            let this_round = entry.per_round.get(round - 1).copied().unwrap_or(0);
            let past = entry.total - this_round;
            println!(
                "{:<14} {:>6} {:>+11} {:>7}",
                self.team_name(i),
                past,
                this_round,
                entry.total
            );
        }
    }

    fn obtain_pending_command(&mut self, snapshot: &GameSnapshot) -> Command {
        if snapshot.timer_state == Some(TimerState::Paused) {
            println!("\nGame paused.");
            loop {
                println!("- [r]: resume");
                println!("- [q]: quit the game");
                match self.read_line().as_str() {
                    "r" => return Command::Resume,
                    "q" => return Command::ForceEndGame,
                    _ => continue,
                }
            }
        }

        self.render_card(snapshot);
        let prompted_at = Instant::now();
        loop {
            let input = self.read_line();
            let elapsed = prompted_at.elapsed();
            let command = match ConsoleCommand::from_str(&input) {
                Ok(ConsoleCommand::Correct) => Command::MarkCorrect,
                Ok(ConsoleCommand::Incorrect) => Command::MarkIncorrect,
                Ok(ConsoleCommand::Pass) => Command::MarkPass,
                Ok(ConsoleCommand::Pause) => Command::Pause,
                Ok(ConsoleCommand::EndTurn) => Command::EndTurnEarly,
                Ok(ConsoleCommand::Quit) => Command::ForceEndGame,
                Ok(ConsoleCommand::Scoreboard) => {
                    self.render_scoreboard(snapshot);
                    continue;
                }
                Ok(ConsoleCommand::Rules) => {
                    println!("{}", RULES);
                    continue;
                }
                Err(_) => {
                    self.print_options();
                    continue;
                }
            };
            // the clock keeps running while the human decides: tick first,
            // then apply the chosen command on the next pass
            self.pending = Some(command);
            return Command::Tick(elapsed);
        }
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ConsolePresenter {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TurnStarted {
                team_index,
                round_number,
            } => println!(
                "~ Turn started: {} (round {})",
                self.team_name(*team_index),
                round_number
            ),
            GameEvent::Correct { team_index } => {
                println!("~ Correct: +1 for {}", self.team_name(*team_index))
            }
            GameEvent::Incorrect { team_index } => {
                println!("~ Incorrect: -1 for {}", self.team_name(*team_index))
            }
            GameEvent::Pass {
                team_index,
                passes_remaining,
            } => println!(
                "~ Pass: {} has {} left",
                self.team_name(*team_index),
                passes_remaining
            ),
            GameEvent::TurnCommitted {
                team_index,
                net_score,
                total,
                ..
            } => println!(
                "~ Turn over: {} scored {:+}, total is now {}",
                self.team_name(*team_index),
                net_score,
                total
            ),
            GameEvent::GameWon { winners } => {
                let banner = winners.iter().map(|&w| self.team_name(w)).join(", ");
                println!("\n*** Winner: {} ***", banner);
            }
        }
    }

    fn obtain_command(&mut self, snapshot: &GameSnapshot) -> Command {
        self.team_names = snapshot.teams.iter().map(|t| t.name.clone()).collect();

        if let Some(command) = self.pending.take() {
            if snapshot.phase == GamePhase::TurnActive {
                return command;
            }
            // the tick ended the turn before the queued command could apply
        }

        match snapshot.phase {
            GamePhase::TurnPending => {
                println!(
                    "\nNext up: {} (round {}, target {})",
                    self.team_name(snapshot.current_team_index),
                    snapshot.current_round_number,
                    snapshot.target_score
                );
                loop {
                    println!("- [b]: begin the turn");
                    println!("- [s]: show the scoreboard");
                    println!("- [r]: display rules");
                    println!("- [q]: quit the game");
                    match self.read_line().as_str() {
                        "b" => return Command::BeginTurn,
                        "s" => self.render_scoreboard(snapshot),
                        "r" => println!("{}", RULES),
                        "q" => return Command::ForceEndGame,
                        _ => continue,
                    }
                }
            }
            GamePhase::TurnActive => self.obtain_pending_command(snapshot),
            GamePhase::TurnSummary => {
                self.render_scoreboard(snapshot);
                loop {
                    println!("- [n]: next team");
                    println!("- [q]: quit the game");
                    match self.read_line().as_str() {
                        "n" => return Command::AdvanceToNextTeam,
                        "q" => return Command::ForceEndGame,
                        _ => continue,
                    }
                }
            }
            // Setup and GameEnded never reach the prompt; bail out cleanly
            // if they somehow do
            GamePhase::Setup | GamePhase::GameEnded => Command::ForceEndGame,
        }
    }

    fn game_over(&mut self, standings: &[StandingsRow], winners: &[usize]) {
        println!("\n=== Final standings ===");
        for line in format_standings(standings, winners) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taboo_core::Team;

    #[test]
    fn commands_should_parse_from_their_shortcuts() {
        assert_eq!(ConsoleCommand::from_str("c"), Ok(ConsoleCommand::Correct));
        assert_eq!(ConsoleCommand::from_str("x"), Ok(ConsoleCommand::Incorrect));
        assert_eq!(ConsoleCommand::from_str("p"), Ok(ConsoleCommand::Pass));
        assert_eq!(ConsoleCommand::from_str("q"), Ok(ConsoleCommand::Quit));
        assert!(ConsoleCommand::from_str("nope").is_err());
    }

    #[test]
    fn every_command_should_carry_a_shortcut_and_a_description() {
        for cmd in ConsoleCommand::iter() {
            assert_eq!(cmd.to_string().len(), 1, "{:?}", cmd);
            assert!(cmd.get_message().is_some(), "{:?}", cmd);
        }
    }

    #[test]
    fn unknown_team_index_should_fall_back_to_a_numbered_name() {
        let presenter = ConsolePresenter::new();
        assert_eq!(presenter.team_name(3), "team 3");
    }

    #[test]
    fn final_standings_should_rank_teams_and_mark_the_winners() {
        let standings = vec![
            StandingsRow {
                team_index: 1,
                team: Team::new(2, "Blues"),
                total: 11,
            },
            StandingsRow {
                team_index: 0,
                team: Team::new(1, "Reds"),
                total: 8,
            },
        ];

        let lines = format_standings(&standings, &[1]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. Blues"));
        assert!(lines[0].ends_with("* winner"));
        assert!(lines[1].starts_with(" 2. Reds"));
        assert!(!lines[1].contains("winner"));
    }
}
