use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::{
    card::Card,
    config::{ConfigError, GameConfiguration, Team},
    deck::WordDeck,
    error::GameError,
    event::{FeedbackSink, GameEvent},
    ledger::{ScoreLedger, TeamScore},
    source::WordSource,
    timer::TimerState,
    turn::{RoundTally, TurnController},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    TurnPending,
    TurnActive,
    TurnSummary,
    GameEnded,
}

/// Read-only view of the whole game for presenters. Everything in here is a
/// copy; mutating it cannot reach the live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub current_team_index: usize,
    pub current_round_number: usize,
    pub target_score: i32,
    pub teams: Vec<Team>,
    pub tally: Option<RoundTally>,
    pub passes_remaining: Option<u32>,
    pub current_card: Option<Card>,
    pub remaining_time: Option<Duration>,
    pub timer_state: Option<TimerState>,
    pub scores: Vec<TeamScore>,
    pub winners: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_index: usize,
    pub team: Team,
    pub total: i32,
}

/// All team indices sharing the maximum total, in original team order, if
/// that maximum has reached `target`; empty otherwise.
pub fn winning_teams(totals: &[i32], target: i32) -> Vec<usize> {
    let Some(&max) = totals.iter().max() else {
        return vec![];
    };
    if max < target {
        return vec![];
    }
    totals
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t == max)
        .map(|(i, _)| i)
        .collect()
}

/// Top-level state machine: owns the deck, the ledger and the active turn,
/// sequences team rotation and round increments, and decides the winner at
/// commit boundaries only.
pub struct GameCoordinator {
    config: GameConfiguration,
    deck: WordDeck,
    ledger: ScoreLedger,
    turn: Option<TurnController>,
    current_team_index: usize,
    current_round_number: usize,
    phase: GamePhase,
    winners: Vec<usize>,
    log: Vec<GameEvent>,
    sinks: Vec<Box<dyn FeedbackSink>>,
}

impl GameCoordinator {
    pub fn new(config: GameConfiguration) -> Result<Self, ConfigError> {
        Self::with_deck(config, WordDeck::new())
    }

    /// Deterministic deck order for tests.
    pub fn with_seed(config: GameConfiguration, seed: u64) -> Result<Self, ConfigError> {
        Self::with_deck(config, WordDeck::with_seed(seed))
    }

    fn with_deck(config: GameConfiguration, deck: WordDeck) -> Result<Self, ConfigError> {
        config.validate()?;
        let ledger = ScoreLedger::new(&config.teams);
        Ok(GameCoordinator {
            config,
            deck,
            ledger,
            turn: None,
            current_team_index: 0,
            current_round_number: 1,
            phase: GamePhase::Setup,
            winners: vec![],
            log: vec![],
            sinks: vec![],
        })
    }

    /// Fills the deck from a word source. A failed or empty fetch surfaces as
    /// a retryable error and the phase does not move; the game can never
    /// start on a silently empty deck.
    pub fn load_words(
        &mut self,
        source: &mut dyn WordSource,
        limit: usize,
    ) -> Result<(), GameError> {
        if matches!(self.phase, GamePhase::TurnActive | GamePhase::GameEnded) {
            return Err(GameError::InvalidPhase(self.phase));
        }
        let cards = source.fetch_cards(limit)?;
        if cards.is_empty() {
            return Err(GameError::WordSource(crate::error::WordSourceError(
                "source returned no cards".to_string(),
            )));
        }
        log::info!("loaded {} cards into the deck", cards.len());
        self.deck.load(cards);
        self.deck.shuffle();
        if self.phase == GamePhase::Setup {
            self.phase = GamePhase::TurnPending;
        }
        Ok(())
    }

    pub fn begin_turn(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnPending)?;
        let mut turn = TurnController::new(
            self.current_team_index,
            self.current_round_number,
            self.config.passes_per_round,
        );
        turn.begin_turn(&mut self.deck, self.config.turn_duration())?;
        self.turn = Some(turn);
        self.phase = GamePhase::TurnActive;
        log::info!(
            "turn started: round {} team {}",
            self.current_round_number,
            self.current_team_index
        );
        self.emit(GameEvent::TurnStarted {
            team_index: self.current_team_index,
            round_number: self.current_round_number,
        });
        Ok(())
    }

    pub fn mark_correct(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnActive)?;
        let team_index = {
            let turn = self.turn.as_mut().ok_or(GameError::InvalidPhase(self.phase))?;
            turn.mark_correct(&mut self.deck)?;
            turn.team_index()
        };
        self.emit(GameEvent::Correct { team_index });
        Ok(())
    }

    pub fn mark_incorrect(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnActive)?;
        let team_index = {
            let turn = self.turn.as_mut().ok_or(GameError::InvalidPhase(self.phase))?;
            turn.mark_incorrect(&mut self.deck)?;
            turn.team_index()
        };
        self.emit(GameEvent::Incorrect { team_index });
        Ok(())
    }

    pub fn mark_pass(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnActive)?;
        let (team_index, passes_remaining) = {
            let turn = self.turn.as_mut().ok_or(GameError::InvalidPhase(self.phase))?;
            turn.mark_pass(&mut self.deck)?;
            (turn.team_index(), turn.passes_remaining())
        };
        self.emit(GameEvent::Pass {
            team_index,
            passes_remaining,
        });
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnActive)?;
        self.active_turn()?.pause();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnActive)?;
        self.active_turn()?.resume();
        Ok(())
    }

    /// Advances the turn clock. On expiry the turn commits and the phase
    /// moves to the summary, all within this call, so no reader can observe
    /// an expired timer with an uncommitted tally.
    pub fn tick(&mut self, elapsed: Duration) -> Result<(), GameError> {
        if self.phase != GamePhase::TurnActive {
            return Ok(());
        }
        let expired = self.active_turn()?.tick(elapsed).is_some();
        if expired {
            self.finish_turn()?;
        }
        Ok(())
    }

    /// Ends the running turn before the clock runs out. Commits like an
    /// expiry would.
    pub fn end_turn_early(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnActive)?;
        self.finish_turn()
    }

    fn finish_turn(&mut self) -> Result<(), GameError> {
        let (team_index, round_number, net_score, total) = {
            let turn = self.turn.as_mut().ok_or(GameError::InvalidPhase(self.phase))?;
            let net_score = turn.tally().net_score();
            let total = turn.end_turn(&mut self.ledger)?;
            (turn.team_index(), turn.round_number(), net_score, total)
        };
        self.phase = GamePhase::TurnSummary;
        log::info!(
            "turn committed: round {} team {} net {} total {}",
            round_number,
            team_index,
            net_score,
            total
        );
        self.emit(GameEvent::TurnCommitted {
            team_index,
            round_number,
            net_score,
            total,
        });
        self.check_for_winner(total);
        Ok(())
    }

    /// Runs only at the commit boundary. A team wins when its own commit
    /// lifts its total to the target; other teams are never re-evaluated
    /// retroactively.
    fn check_for_winner(&mut self, committed_total: i32) {
        if committed_total < self.config.target_score {
            return;
        }
        let totals: Vec<i32> = (0..self.ledger.team_count())
            .map(|i| self.ledger.total_of(i))
            .collect();
        self.winners = winning_teams(&totals, self.config.target_score);
        self.phase = GamePhase::GameEnded;
        log::info!("game won by teams {:?}", self.winners);
        self.emit(GameEvent::GameWon {
            winners: self.winners.clone(),
        });
    }

    /// Rotates to the next team; a wrap back to team 0 starts the next
    /// round. Human-driven, only valid from the turn summary.
    pub fn advance_to_next_team(&mut self) -> Result<(), GameError> {
        self.ensure_phase(GamePhase::TurnSummary)?;
        self.turn = None;
        self.current_team_index = (self.current_team_index + 1) % self.config.teams.len();
        if self.current_team_index == 0 {
            self.current_round_number += 1;
        }
        self.phase = GamePhase::TurnPending;
        Ok(())
    }

    /// Abandons the game. An active turn's partial tally is discarded, never
    /// committed; no winner is declared.
    pub fn force_end_game(&mut self) -> Result<(), GameError> {
        if self.phase == GamePhase::GameEnded {
            return Err(GameError::InvalidPhase(self.phase));
        }
        if let Some(turn) = self.turn.as_mut() {
            turn.abandon();
        }
        self.phase = GamePhase::GameEnded;
        log::info!("game ended by request, no winner");
        Ok(())
    }

    fn active_turn(&mut self) -> Result<&mut TurnController, GameError> {
        let phase = self.phase;
        self.turn
            .as_mut()
            .ok_or(GameError::InvalidPhase(phase))
    }

    fn ensure_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase(self.phase))
        }
    }

    fn emit(&mut self, event: GameEvent) {
        for sink in &mut self.sinks {
            sink.notify(&event);
        }
        self.log.push(event);
    }

    pub fn add_feedback_sink(&mut self, sink: Box<dyn FeedbackSink>) {
        self.sinks.push(sink);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.log
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let turn = self.turn.as_ref();
        GameSnapshot {
            phase: self.phase,
            current_team_index: self.current_team_index,
            current_round_number: self.current_round_number,
            target_score: self.config.target_score,
            teams: self.config.teams.clone(),
            tally: turn.map(|t| t.tally()),
            passes_remaining: turn.map(|t| t.passes_remaining()),
            current_card: turn.and_then(|t| t.current_card().cloned()),
            remaining_time: turn.map(|t| t.remaining_time()),
            timer_state: turn.map(|t| t.timer_state()),
            scores: self.ledger.snapshot(),
            winners: self.winners.clone(),
        }
    }

    /// Final (or interim) ranking: totals descending, ties kept in original
    /// team order.
    pub fn standings(&self) -> Vec<StandingsRow> {
        self.config
            .teams
            .iter()
            .enumerate()
            .map(|(i, team)| StandingsRow {
                team_index: i,
                team: team.clone(),
                total: self.ledger.total_of(i),
            })
            .sorted_by_key(|row| std::cmp::Reverse(row.total))
            .collect()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_team_index(&self) -> usize {
        self.current_team_index
    }

    pub fn current_round_number(&self) -> usize {
        self.current_round_number
    }

    pub fn winners(&self) -> &[usize] {
        &self.winners
    }

    pub fn total_of(&self, team_index: usize) -> i32 {
        self.ledger.total_of(team_index)
    }

    pub fn past_rounds_total(&self, team_index: usize, before_round: usize) -> i32 {
        self.ledger.past_rounds_total(team_index, before_round)
    }

    pub fn config(&self) -> &GameConfiguration {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::WordSourceError,
        source::{StaticWordSource, WordSource},
    };
    use std::{cell::RefCell, rc::Rc};

    fn config(team_count: usize, target_score: i32, passes: u32) -> GameConfiguration {
        let names = ["Reds", "Blues", "Greens", "Yellows"];
        GameConfiguration {
            teams: (0..team_count)
                .map(|i| Team::new(i as u32 + 1, names[i]))
                .collect(),
            seconds_per_round: 60,
            target_score,
            passes_per_round: passes,
        }
    }

    fn game(team_count: usize, target_score: i32, passes: u32) -> GameCoordinator {
        let mut game = GameCoordinator::with_seed(config(team_count, target_score, passes), 42)
            .unwrap();
        game.load_words(&mut StaticWordSource::builtin(), 64).unwrap();
        game
    }

    /// Plays one full turn: `correct` right guesses, `incorrect` wrong ones,
    /// then ends it early.
    fn play_turn(game: &mut GameCoordinator, correct: u32, incorrect: u32) {
        game.begin_turn().unwrap();
        for _ in 0..correct {
            game.mark_correct().unwrap();
        }
        for _ in 0..incorrect {
            game.mark_incorrect().unwrap();
        }
        game.end_turn_early().unwrap();
    }

    struct FailingSource;

    impl WordSource for FailingSource {
        fn fetch_cards(&mut self, _limit: usize) -> Result<Vec<Card>, WordSourceError> {
            Err(WordSourceError("network timeout".to_string()))
        }
    }

    #[test]
    fn phase_display_names_should_be_distinct() {
        use strum::IntoEnumIterator;

        // phase errors name the offending phase, so the names must not
        // collide
        let names: Vec<String> = GamePhase::iter().map(|p| p.to_string()).collect();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all_unique());
    }

    #[test]
    fn word_source_failure_should_be_retryable() {
        let mut game = GameCoordinator::with_seed(config(2, 30, 3), 1).unwrap();

        assert!(game.load_words(&mut FailingSource, 64).is_err());
        assert_eq!(game.phase(), GamePhase::Setup);
        assert!(game.begin_turn().is_err());

        // the retry with a working source brings the game up
        game.load_words(&mut StaticWordSource::builtin(), 64).unwrap();
        assert_eq!(game.phase(), GamePhase::TurnPending);
        game.begin_turn().unwrap();
    }

    #[test]
    fn rotation_should_wrap_teams_and_increment_rounds() {
        let mut game = game(3, 1000, 3);
        let mut rounds = vec![];
        let mut teams = vec![];

        for i in 0..7 {
            rounds.push(game.current_round_number());
            teams.push(game.current_team_index());
            play_turn(&mut game, 1, 0);
            if i < 6 {
                game.advance_to_next_team().unwrap();
            }
        }

        assert_eq!(rounds, vec![1, 1, 1, 2, 2, 2, 3]);
        assert_eq!(teams, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn advance_should_only_be_valid_from_the_summary() {
        let mut game = game(2, 30, 3);
        assert!(matches!(
            game.advance_to_next_team(),
            Err(GameError::InvalidPhase(GamePhase::TurnPending))
        ));
    }

    #[test]
    fn timer_expiry_should_commit_the_turn() {
        let mut game = game(2, 30, 3);
        game.begin_turn().unwrap();
        game.mark_correct().unwrap();
        game.mark_correct().unwrap();

        game.tick(Duration::from_secs(59)).unwrap();
        assert_eq!(game.phase(), GamePhase::TurnActive);

        game.tick(Duration::from_secs(1)).unwrap();
        assert_eq!(game.phase(), GamePhase::TurnSummary);
        assert_eq!(game.total_of(0), 2);

        // further ticks are inert outside of an active turn
        game.tick(Duration::from_secs(10)).unwrap();
        assert_eq!(game.total_of(0), 2);
    }

    #[test]
    fn pause_should_stop_the_clock() {
        let mut game = game(2, 30, 3);
        game.begin_turn().unwrap();

        game.tick(Duration::from_secs(10)).unwrap();
        game.pause().unwrap();
        game.tick(Duration::from_secs(500)).unwrap();
        assert_eq!(game.phase(), GamePhase::TurnActive);
        assert_eq!(
            game.snapshot().remaining_time,
            Some(Duration::from_secs(50))
        );

        game.resume().unwrap();
        game.tick(Duration::from_secs(50)).unwrap();
        assert_eq!(game.phase(), GamePhase::TurnSummary);
    }

    #[test]
    fn winner_should_be_declared_at_the_committing_teams_own_boundary() {
        let mut game = game(2, 30, 3);

        play_turn(&mut game, 28, 0);
        game.advance_to_next_team().unwrap();
        play_turn(&mut game, 5, 0);
        game.advance_to_next_team().unwrap();

        // 28 -> 31 crosses the target of 30
        play_turn(&mut game, 3, 0);
        assert_eq!(game.phase(), GamePhase::GameEnded);
        assert_eq!(game.winners(), &[0]);

        // no subsequent turn can run or alter the outcome
        assert!(game.begin_turn().is_err());
        assert!(game.advance_to_next_team().is_err());
        assert_eq!(game.total_of(1), 5);
    }

    #[test]
    fn mid_turn_score_should_never_trigger_the_win_check() {
        let mut game = game(2, 3, 3);
        game.begin_turn().unwrap();
        for _ in 0..10 {
            game.mark_correct().unwrap();
        }
        // provisional tally is far past the target, but no commit happened
        assert_eq!(game.phase(), GamePhase::TurnActive);
        assert_eq!(game.total_of(0), 0);

        game.end_turn_early().unwrap();
        assert_eq!(game.phase(), GamePhase::GameEnded);
    }

    #[test]
    fn co_winners_should_share_the_maximum_total() {
        assert_eq!(winning_teams(&[30, 30], 30), vec![0, 1]);
        assert_eq!(winning_teams(&[30, 31], 30), vec![1]);
        assert_eq!(winning_teams(&[12, 29], 30), Vec::<usize>::new());
        assert_eq!(winning_teams(&[], 30), Vec::<usize>::new());
    }

    #[test]
    fn standings_should_sort_descending_with_stable_ties() {
        let mut game = game(3, 1000, 3);
        play_turn(&mut game, 2, 0); // Reds 2
        game.advance_to_next_team().unwrap();
        play_turn(&mut game, 5, 0); // Blues 5
        game.advance_to_next_team().unwrap();
        play_turn(&mut game, 2, 0); // Greens 2
        game.advance_to_next_team().unwrap();

        let standings = game.standings();
        assert_eq!(
            standings.iter().map(|r| r.team_index).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );
        assert_eq!(standings[0].total, 5);
        // Reds before Greens: equal totals keep original team order
        assert_eq!(standings[1].team.name, "Reds");
        assert_eq!(standings[2].team.name, "Greens");
    }

    #[test]
    fn force_end_should_discard_the_partial_tally() {
        let mut game = game(2, 30, 3);
        play_turn(&mut game, 4, 0);
        game.advance_to_next_team().unwrap();

        game.begin_turn().unwrap();
        game.mark_correct().unwrap();
        game.mark_correct().unwrap();
        game.force_end_game().unwrap();

        assert_eq!(game.phase(), GamePhase::GameEnded);
        assert_eq!(game.total_of(0), 4);
        assert_eq!(game.total_of(1), 0);
        assert!(game.winners().is_empty());
    }

    #[test]
    fn full_two_team_scenario_should_end_with_the_second_team_winning() {
        let mut game = game(2, 10, 2);

        play_turn(&mut game, 5, 2);
        assert_eq!(game.total_of(0), 3);
        assert_eq!(game.phase(), GamePhase::TurnSummary);
        game.advance_to_next_team().unwrap();

        play_turn(&mut game, 8, 1);
        assert_eq!(game.total_of(1), 7);
        game.advance_to_next_team().unwrap();
        assert_eq!(game.current_round_number(), 2);

        play_turn(&mut game, 6, 1);
        assert_eq!(game.total_of(0), 8);
        game.advance_to_next_team().unwrap();

        play_turn(&mut game, 4, 0);
        assert_eq!(game.total_of(1), 11);
        assert_eq!(game.phase(), GamePhase::GameEnded);
        assert_eq!(game.winners(), &[1]);
        assert_eq!(game.total_of(0), 8);

        // the ledger history matches the played rounds
        assert_eq!(game.past_rounds_total(0, 2), 3);
        assert_eq!(game.past_rounds_total(1, 2), 7);
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Rc<RefCell<Vec<GameEvent>>>,
    }

    impl FeedbackSink for RecordingSink {
        fn notify(&mut self, event: &GameEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn feedback_sink_should_observe_discrete_events_in_order() {
        let events = Rc::new(RefCell::new(vec![]));
        let mut game = game(2, 2, 3);
        game.add_feedback_sink(Box::new(RecordingSink {
            events: Rc::clone(&events),
        }));

        game.begin_turn().unwrap();
        game.mark_correct().unwrap();
        game.mark_pass().unwrap();
        game.mark_correct().unwrap();
        game.end_turn_early().unwrap();

        let seen = events.borrow();
        assert!(matches!(seen[0], GameEvent::TurnStarted { .. }));
        assert!(matches!(seen[1], GameEvent::Correct { .. }));
        assert!(matches!(
            seen[2],
            GameEvent::Pass {
                passes_remaining: 2,
                ..
            }
        ));
        assert!(matches!(
            seen[4],
            GameEvent::TurnCommitted { net_score: 2, .. }
        ));
        assert!(matches!(seen[5], GameEvent::GameWon { .. }));
    }
}
