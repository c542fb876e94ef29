//! Schedule: the ordered matchups produced by a generator, plus score updates.

use crate::logic::{compute_standings, TeamStanding};
use crate::models::game::{CompletionRule, Match, Matchup};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or editing a schedule.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ScheduleError {
    /// Need at least 4 players to form two teams.
    #[error("Need at least {required} players to generate matchups (have {actual})")]
    NotEnoughPlayers { required: usize, actual: usize },
    #[error("{name} must be between {min} and {max} (got {value})")]
    LoadOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("Player id {0} appears more than once in the roster")]
    DuplicatePlayerId(String),
    #[error("Player name {0:?} appears more than once in the roster")]
    DuplicatePlayerName(String),
    #[error("The generator produced no matchups")]
    EmptySchedule,
    #[error("Match {0} not found")]
    MatchNotFound(String),
    #[error("Match {0} does not belong to this schedule's teams")]
    TeamsChanged(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub matchups: Vec<Matchup>,
    /// Rule used to recompute `is_completed` on every score update.
    pub completion_rule: CompletionRule,
}

impl Schedule {
    pub fn new(matchups: Vec<Matchup>, completion_rule: CompletionRule) -> Self {
        Self {
            matchups,
            completion_rule,
        }
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matchups.iter().flat_map(|m| m.matches.iter())
    }

    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    pub fn completed_count(&self) -> usize {
        self.matches().filter(|m| m.is_completed()).count()
    }

    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.matches().find(|m| m.id == match_id)
    }

    fn position(&self, match_id: &str) -> Option<(usize, usize)> {
        self.matchups.iter().enumerate().find_map(|(i, mu)| {
            mu.matches
                .iter()
                .position(|m| m.id == match_id)
                .map(|j| (i, j))
        })
    }

    /// Set a match's scores. The matchup holding it is swapped for a rebuilt copy, so readers
    /// never see a half-updated matchup.
    pub fn update_score(
        &mut self,
        match_id: &str,
        team1_score: u32,
        team2_score: u32,
    ) -> Result<&Match, ScheduleError> {
        let (i, j) = self
            .position(match_id)
            .ok_or_else(|| ScheduleError::MatchNotFound(match_id.to_string()))?;
        let updated = self.matchups[i].matches[j].with_score(
            team1_score,
            team2_score,
            self.completion_rule,
        );
        self.swap_match(i, j, updated);
        Ok(&self.matchups[i].matches[j])
    }

    /// Replace a match with an externally rescored copy (same id and teams). Completion is
    /// taken from the copy, which was computed from its own scores.
    pub fn replace_match(&mut self, updated: Match) -> Result<(), ScheduleError> {
        let (i, j) = self
            .position(&updated.id)
            .ok_or_else(|| ScheduleError::MatchNotFound(updated.id.clone()))?;
        let current = &self.matchups[i].matches[j];
        if current.team1.id != updated.team1.id || current.team2.id != updated.team2.id {
            return Err(ScheduleError::TeamsChanged(updated.id));
        }
        self.swap_match(i, j, updated);
        Ok(())
    }

    fn swap_match(&mut self, i: usize, j: usize, updated: Match) {
        let mut matchup = self.matchups[i].clone();
        matchup.matches[j] = updated;
        self.matchups[i] = matchup;
    }

    /// Zero every score (all matches back to not completed).
    pub fn reset_scores(&mut self) {
        let rule = self.completion_rule;
        for matchup in &mut self.matchups {
            for m in &mut matchup.matches {
                m.record_score(0, 0, rule);
            }
        }
    }

    /// Team standings, recomputed from scratch.
    pub fn standings(&self) -> Vec<TeamStanding> {
        compute_standings(&self.matchups)
    }
}
