//! Setup: validate the roster and load, then run the chosen generator.

use crate::logic::random::SeedSource;
use crate::logic::{generate_matchups, generate_matchups_by_player_load_seeded, MIN_PLAYERS};
use crate::models::{CompletionRule, Player, Schedule, ScheduleError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound offered for matches per team matchup.
pub const MAX_MATCHES_PER_MATCHUP: u32 = 10;
/// Upper bound offered for matches per player.
pub const MAX_MATCHES_PER_PLAYER: u32 = 20;

/// How the schedule is generated, with its load parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method", content = "load")]
pub enum GenerationMethod {
    /// Every legal team pairing, each played this many times.
    PerMatchup(u32),
    /// Random pairings until each player has about this many matches.
    PerPlayer(u32),
}

impl Default for GenerationMethod {
    fn default() -> Self {
        GenerationMethod::PerMatchup(1)
    }
}

impl GenerationMethod {
    pub fn validate(self) -> Result<(), ScheduleError> {
        let (name, value, max) = match self {
            GenerationMethod::PerMatchup(n) => ("matches per matchup", n, MAX_MATCHES_PER_MATCHUP),
            GenerationMethod::PerPlayer(n) => ("matches per player", n, MAX_MATCHES_PER_PLAYER),
        };
        if value < 1 || value > max {
            return Err(ScheduleError::LoadOutOfRange {
                name,
                value,
                min: 1,
                max,
            });
        }
        Ok(())
    }
}

/// Everything needed to build a schedule besides the roster.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub method: GenerationMethod,
    #[serde(default)]
    pub completion_rule: CompletionRule,
    /// Only used by `PerPlayer`.
    #[serde(default)]
    pub seed: SeedSource,
}

impl ScheduleConfig {
    pub fn per_matchup(matches_per_matchup: u32) -> Self {
        Self {
            method: GenerationMethod::PerMatchup(matches_per_matchup),
            ..Default::default()
        }
    }

    pub fn per_player(matches_per_player: u32) -> Self {
        Self {
            method: GenerationMethod::PerPlayer(matches_per_player),
            ..Default::default()
        }
    }

    pub fn with_completion_rule(mut self, rule: CompletionRule) -> Self {
        self.completion_rule = rule;
        self
    }

    pub fn with_seed(mut self, seed: SeedSource) -> Self {
        self.seed = seed;
        self
    }
}

/// Check the roster before generation: at least 4 players, unique ids, unique names
/// (case-insensitive).
pub fn validate_roster(players: &[Player]) -> Result<(), ScheduleError> {
    if players.len() < MIN_PLAYERS {
        return Err(ScheduleError::NotEnoughPlayers {
            required: MIN_PLAYERS,
            actual: players.len(),
        });
    }
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for p in players {
        if !ids.insert(&p.id) {
            return Err(ScheduleError::DuplicatePlayerId(p.id.to_string()));
        }
        if !names.insert(p.name.trim().to_ascii_lowercase()) {
            return Err(ScheduleError::DuplicatePlayerName(p.name.clone()));
        }
    }
    Ok(())
}

/// Validate inputs and generate a fresh schedule (all matches 0-0, not completed).
pub fn build_schedule(
    players: &[Player],
    config: &ScheduleConfig,
) -> Result<Schedule, ScheduleError> {
    validate_roster(players)?;
    config.method.validate()?;

    let matchups = match config.method {
        GenerationMethod::PerMatchup(n) => generate_matchups(players, n),
        GenerationMethod::PerPlayer(n) => {
            generate_matchups_by_player_load_seeded(players, n, config.seed)
        }
    };
    if matchups.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }

    let schedule = Schedule::new(matchups, config.completion_rule);
    log::info!(
        "Built schedule: {} matchups, {} matches for {} players ({:?})",
        schedule.matchups.len(),
        schedule.match_count(),
        players.len(),
        config.method
    );
    Ok(schedule)
}
