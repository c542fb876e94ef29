//! Team standings derived from completed matches.

use crate::models::{Matchup, Side, Team, TeamKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the results table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: Team,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub matches_played: u32,
}

impl TeamStanding {
    fn new(team: &Team) -> Self {
        Self {
            team: team.clone(),
            wins: 0,
            losses: 0,
            ties: 0,
            matches_played: 0,
        }
    }

    pub fn win_rate(&self) -> f32 {
        if self.matches_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.matches_played as f32
        }
    }
}

/// Compute standings from scratch.
///
/// Every team in the schedule gets a row, first-seen order. Completed matches credit the higher
/// score with a win and the other side with a loss; equal scores count as a tie. Rows are sorted
/// by wins (descending) then losses (ascending); the sort is stable.
pub fn compute_standings(matchups: &[Matchup]) -> Vec<TeamStanding> {
    let mut rows: Vec<TeamStanding> = Vec::new();
    let mut index: HashMap<TeamKey, usize> = HashMap::new();

    for matchup in matchups {
        for team in [&matchup.team1, &matchup.team2] {
            index.entry(team.key()).or_insert_with(|| {
                rows.push(TeamStanding::new(team));
                rows.len() - 1
            });
        }
    }

    for m in matchups
        .iter()
        .flat_map(|mu| mu.matches.iter())
        .filter(|m| m.is_completed())
    {
        let (Some(&i1), Some(&i2)) = (index.get(&m.team1.key()), index.get(&m.team2.key())) else {
            continue;
        };
        rows[i1].matches_played += 1;
        rows[i2].matches_played += 1;
        match m.leader() {
            Some(Side::One) => {
                rows[i1].wins += 1;
                rows[i2].losses += 1;
            }
            Some(Side::Two) => {
                rows[i2].wins += 1;
                rows[i1].losses += 1;
            }
            None => {
                rows[i1].ties += 1;
                rows[i2].ties += 1;
            }
        }
    }

    rows.sort_by(|a, b| b.wins.cmp(&a.wins).then(a.losses.cmp(&b.losses)));
    rows
}
