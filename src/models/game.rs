//! Match, Matchup, Side and the rule deciding when a match counts as completed.

use crate::models::team::{MatchupKey, Team};
use serde::{Deserialize, Serialize};

/// Which team of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

/// When a match is considered completed, derived from its scores.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "points")]
pub enum CompletionRule {
    /// Any non-zero score (score-entry grid).
    #[default]
    AnyPoints,
    /// Either team reached the given number of points (rally scoring, 21 in beach volleyball).
    TargetPoints(u32),
}

impl CompletionRule {
    pub fn is_completed(self, team1_score: u32, team2_score: u32) -> bool {
        match self {
            CompletionRule::AnyPoints => team1_score > 0 || team2_score > 0,
            CompletionRule::TargetPoints(target) => team1_score >= target || team2_score >= target,
        }
    }
}

/// One scoreable contest between two teams.
///
/// `is_completed` is never set directly: it is recomputed whenever the scores change.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub team1: Team,
    pub team2: Team,
    team1_score: u32,
    team2_score: u32,
    is_completed: bool,
}

impl Match {
    /// Unplayed match: 0-0, not completed.
    pub fn new(id: impl Into<String>, team1: Team, team2: Team) -> Self {
        Self {
            id: id.into(),
            team1,
            team2,
            team1_score: 0,
            team2_score: 0,
            is_completed: false,
        }
    }

    pub fn team1_score(&self) -> u32 {
        self.team1_score
    }

    pub fn team2_score(&self) -> u32 {
        self.team2_score
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Same match with new scores; completion is recomputed under `rule`.
    pub fn with_score(&self, team1_score: u32, team2_score: u32, rule: CompletionRule) -> Self {
        Self {
            team1_score,
            team2_score,
            is_completed: rule.is_completed(team1_score, team2_score),
            ..self.clone()
        }
    }

    /// Set scores in place under the default rule (any non-zero score completes the match).
    pub fn set_score(&mut self, team1_score: u32, team2_score: u32) {
        self.record_score(team1_score, team2_score, CompletionRule::AnyPoints);
    }

    pub fn record_score(&mut self, team1_score: u32, team2_score: u32, rule: CompletionRule) {
        self.team1_score = team1_score;
        self.team2_score = team2_score;
        self.is_completed = rule.is_completed(team1_score, team2_score);
    }

    /// Higher score wins; `None` for a tie.
    pub fn leader(&self) -> Option<Side> {
        match self.team1_score.cmp(&self.team2_score) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// One unique team-vs-team pairing and the matches played under it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    pub team1: Team,
    pub team2: Team,
    pub matches: Vec<Match>,
}

impl Matchup {
    /// Build a matchup with `match_count` unplayed matches, ids `<matchup id>-match-<k>`
    /// (k from 1).
    pub fn new(team1: Team, team2: Team, match_count: u32) -> Self {
        let id = MatchupKey::of(&team1, &team2).to_string();
        let matches = (1..=match_count)
            .map(|k| Match::new(format!("{id}-match-{k}"), team1.clone(), team2.clone()))
            .collect();
        Self {
            id,
            team1,
            team2,
            matches,
        }
    }

    pub fn key(&self) -> MatchupKey {
        MatchupKey::of(&self.team1, &self.team2)
    }
}
