//! Beach doubles scheduler: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    build_schedule, compute_standings, enumerate_teams, generate_matchups,
    generate_matchups_by_player_load, generate_matchups_by_player_load_seeded, validate_roster,
    GenerationMethod, PointLog, PointLogSummary, Rally, ScheduleConfig, SeedSource, TeamStanding,
};
pub use models::{
    CompletionRule, Match, Matchup, MatchupKey, Player, PlayerId, Roster, RosterError, Schedule,
    ScheduleError, Side, Team, TeamError, TeamKey,
};
