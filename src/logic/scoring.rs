//! Rally scoring for a single match: points per set, undo, set winners.

use crate::models::{CompletionRule, Match, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Points needed to take a set.
pub const DEFAULT_SET_POINTS: u32 = 21;

/// One point won by `side` in set `set_number` (sets count from 1).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rally {
    pub side: Side,
    pub set_number: u32,
}

/// Score of one set, as shown next to the match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub set_number: u32,
    pub team1: u32,
    pub team2: u32,
    pub winner: Option<Side>,
}

/// Read-only view of a point log: per-set scores and sets won by each team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointLogSummary {
    pub current_set: u32,
    pub rallies_played: usize,
    pub sets: Vec<SetScore>,
    pub team1_sets: u32,
    pub team2_sets: u32,
}

/// Point-by-point history of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointLog {
    rallies: Vec<Rally>,
    current_set: u32,
    set_points: u32,
}

impl Default for PointLog {
    fn default() -> Self {
        Self::new(DEFAULT_SET_POINTS)
    }
}

impl PointLog {
    pub fn new(set_points: u32) -> Self {
        Self {
            rallies: Vec::new(),
            current_set: 1,
            set_points,
        }
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn add_point(&mut self, side: Side) {
        self.rallies.push(Rally {
            side,
            set_number: self.current_set,
        });
    }

    /// Remove the most recent point, whatever set it was in.
    pub fn undo_last_point(&mut self) -> Option<Rally> {
        self.rallies.pop()
    }

    /// Set numbers in use: always 1, the current set, and every set with a point.
    pub fn sets(&self) -> Vec<u32> {
        let mut sets: BTreeSet<u32> = self.rallies.iter().map(|r| r.set_number).collect();
        sets.insert(1);
        sets.insert(self.current_set);
        sets.into_iter().collect()
    }

    /// Open a new set after the highest one and make it current.
    pub fn start_new_set(&mut self) -> u32 {
        self.current_set = self.sets().last().copied().unwrap_or(1) + 1;
        self.current_set
    }

    /// Switch scoring to an existing set. Returns false if the set is unknown.
    pub fn select_set(&mut self, set_number: u32) -> bool {
        if self.sets().contains(&set_number) {
            self.current_set = set_number;
            true
        } else {
            false
        }
    }

    /// (team 1, team 2) points in one set.
    pub fn set_score(&self, set_number: u32) -> (u32, u32) {
        tally(self.rallies.iter().filter(|r| r.set_number == set_number))
    }

    pub fn is_set_complete(&self, set_number: u32) -> bool {
        let (t1, t2) = self.set_score(set_number);
        t1 >= self.set_points || t2 >= self.set_points
    }

    /// First side to reach the set target, checking team 1 first.
    pub fn set_winner(&self, set_number: u32) -> Option<Side> {
        let (t1, t2) = self.set_score(set_number);
        if t1 >= self.set_points {
            Some(Side::One)
        } else if t2 >= self.set_points {
            Some(Side::Two)
        } else {
            None
        }
    }

    /// (team 1, team 2) sets won.
    pub fn sets_won(&self) -> (u32, u32) {
        self.sets()
            .into_iter()
            .filter_map(|n| self.set_winner(n))
            .fold((0, 0), |(a, b), side| match side {
                Side::One => (a + 1, b),
                Side::Two => (a, b + 1),
            })
    }

    /// (team 1, team 2) points over the whole match.
    pub fn totals(&self) -> (u32, u32) {
        tally(self.rallies.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.rallies.is_empty()
    }

    pub fn summary(&self) -> PointLogSummary {
        let (team1_sets, team2_sets) = self.sets_won();
        let sets = self
            .sets()
            .into_iter()
            .map(|n| {
                let (team1, team2) = self.set_score(n);
                SetScore {
                    set_number: n,
                    team1,
                    team2,
                    winner: self.set_winner(n),
                }
            })
            .collect();
        PointLogSummary {
            current_set: self.current_set,
            rallies_played: self.rallies.len(),
            sets,
            team1_sets,
            team2_sets,
        }
    }

    /// Copy of `m` scored with this log's totals; complete once either side reaches the set target.
    pub fn apply_to(&self, m: &Match) -> Match {
        let (t1, t2) = self.totals();
        m.with_score(t1, t2, CompletionRule::TargetPoints(self.set_points))
    }
}

fn tally<'a>(rallies: impl Iterator<Item = &'a Rally>) -> (u32, u32) {
    rallies.fold((0, 0), |(a, b), r| match r.side {
        Side::One => (a + 1, b),
        Side::Two => (a, b + 1),
    })
}
