//! Team (two players) and the order-free keys used to compare teams and matchups.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TeamError {
    #[error("A team needs two different players (got {0} twice)")]
    SamePlayer(PlayerId),
}

/// Unordered pair of player ids, stored low-high.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TeamKey {
    low: PlayerId,
    high: PlayerId,
}

impl TeamKey {
    pub fn new(a: &PlayerId, b: &PlayerId) -> Self {
        if a <= b {
            Self {
                low: a.clone(),
                high: b.clone(),
            }
        } else {
            Self {
                low: b.clone(),
                high: a.clone(),
            }
        }
    }

    /// Canonical team id: `<low>-<high>`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

/// Two teams regardless of which one is listed first. Used to deduplicate matchups.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MatchupKey {
    first: TeamKey,
    second: TeamKey,
}

impl MatchupKey {
    /// Teams are ordered by their id string, falling back to the player ids when two distinct
    /// keys happen to render the same id.
    pub fn new(a: TeamKey, b: TeamKey) -> Self {
        let order = a
            .id()
            .cmp(&b.id())
            .then_with(|| (&a.low, &a.high).cmp(&(&b.low, &b.high)));
        match order {
            Ordering::Greater => Self {
                first: b,
                second: a,
            },
            _ => Self {
                first: a,
                second: b,
            },
        }
    }

    pub fn of(team1: &Team, team2: &Team) -> Self {
        Self::new(team1.key(), team2.key())
    }

    pub fn teams(&self) -> (&TeamKey, &TeamKey) {
        (&self.first, &self.second)
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-vs-{}", self.first.id(), self.second.id())
    }
}

/// A doubles team. Member order is kept for display; the id is order-free.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub player1: Player,
    pub player2: Player,
}

impl Team {
    pub fn new(player1: Player, player2: Player) -> Result<Self, TeamError> {
        if player1.id == player2.id {
            return Err(TeamError::SamePlayer(player1.id));
        }
        Ok(Self::pair(player1, player2))
    }

    /// Build without the distinct-player check; callers pair distinct roster slots.
    pub(crate) fn pair(player1: Player, player2: Player) -> Self {
        let id = TeamKey::new(&player1.id, &player2.id).id();
        Self {
            id,
            player1,
            player2,
        }
    }

    pub fn key(&self) -> TeamKey {
        TeamKey::new(&self.player1.id, &self.player2.id)
    }

    pub fn player_ids(&self) -> [&PlayerId; 2] {
        [&self.player1.id, &self.player2.id]
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.player1.id == *id || self.player2.id == *id
    }

    pub fn shares_player_with(&self, other: &Team) -> bool {
        self.player_ids().into_iter().any(|id| other.contains(id))
    }

    /// "Alice & Bob"
    pub fn display_name(&self) -> String {
        format!("{} & {}", self.player1.name, self.player2.name)
    }
}
