//! Scheduling logic: matchup generators, standings, rally scoring, setup validation.

mod exhaustive;
mod player_load;
mod random;
mod scoring;
mod setup;
mod standings;

/// Two teams of two.
pub const MIN_PLAYERS: usize = 4;

pub use exhaustive::{enumerate_teams, generate_matchups};
pub use player_load::{
    generate_matchups_by_player_load, generate_matchups_by_player_load_seeded, ATTEMPTS_PER_MATCH,
};
pub use random::{shuffle, LcgSequence, SeedSource, UnitSource};
pub use scoring::{PointLog, PointLogSummary, Rally, SetScore, DEFAULT_SET_POINTS};
pub use setup::{
    build_schedule, validate_roster, GenerationMethod, ScheduleConfig, MAX_MATCHES_PER_MATCHUP,
    MAX_MATCHES_PER_PLAYER,
};
pub use standings::{compute_standings, TeamStanding};
