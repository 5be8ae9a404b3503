use serde::{Deserialize, Serialize};

use crate::config::Team;

/// One team's committed score history. `per_round[r]` holds the points earned
/// in round `r + 1`; rounds the team has not completed yet count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team_id: u32,
    pub per_round: Vec<i32>,
    pub total: i32,
}

/// The authoritative per-team, per-round score history. Mutated exclusively
/// through `commit_turn`; everything else reads immutable snapshots, so no
/// display surface can alias the live totals.
#[derive(Debug, Clone)]
pub struct ScoreLedger {
    entries: Vec<TeamScore>,
}

impl ScoreLedger {
    pub fn new(teams: &[Team]) -> Self {
        ScoreLedger {
            entries: teams
                .iter()
                .map(|t| TeamScore {
                    team_id: t.id,
                    per_round: vec![],
                    total: 0,
                })
                .collect(),
        }
    }

    /// Folds a turn's net score (possibly negative) into the team's history
    /// and returns the updated total. A second commit for the same team and
    /// round accumulates into the same cell.
    pub fn commit_turn(&mut self, team_index: usize, round_number: usize, net_score: i32) -> i32 {
        debug_assert!(round_number >= 1, "round numbers start at 1");
        let entry = &mut self.entries[team_index];
        if entry.per_round.len() < round_number {
            entry.per_round.resize(round_number, 0);
        }
        entry.per_round[round_number - 1] += net_score;
        entry.total += net_score;
        log::debug!(
            "ledger commit: team {} round {} net {} -> total {}",
            team_index,
            round_number,
            net_score,
            entry.total
        );
        entry.total
    }

    pub fn total_of(&self, team_index: usize) -> i32 {
        self.entries[team_index].total
    }

    /// Sum of the scores committed in rounds strictly before `before_round`.
    pub fn past_rounds_total(&self, team_index: usize, before_round: usize) -> i32 {
        let entry = &self.entries[team_index];
        let upto = before_round.saturating_sub(1).min(entry.per_round.len());
        entry.per_round[..upto].iter().sum()
    }

    /// The team's score in one round, zero if the round was never committed.
    pub fn round_score(&self, team_index: usize, round_number: usize) -> i32 {
        self.entries[team_index]
            .per_round
            .get(round_number.wrapping_sub(1))
            .copied()
            .unwrap_or(0)
    }

    pub fn team_count(&self) -> usize {
        self.entries.len()
    }

    /// Immutable copy for display and serialization.
    pub fn snapshot(&self) -> Vec<TeamScore> {
        self.entries.clone()
    }
}
