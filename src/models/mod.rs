//! Data structures for doubles scheduling: players, teams, matches, matchups, schedules.

mod game;
mod player;
mod roster;
mod schedule;
mod team;

pub use game::{CompletionRule, Match, Matchup, Side};
pub use player::{Player, PlayerId};
pub use roster::{Roster, RosterError};
pub use schedule::{Schedule, ScheduleError};
pub use team::{MatchupKey, Team, TeamError, TeamKey};
