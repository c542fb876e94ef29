//! Random generation bounded by a per-player match load ("matches per player").

use crate::logic::random::{shuffle, SeedSource};
use crate::logic::MIN_PLAYERS;
use crate::models::{Matchup, MatchupKey, Player, PlayerId, Team};
use std::collections::{HashMap, HashSet};

/// Shuffles allowed per targeted match before giving up.
pub const ATTEMPTS_PER_MATCH: usize = 100;

/// Generate single-match matchups so that each player plays about `matches_per_player` times,
/// using the roster-derived seed. Same inputs, same schedule.
pub fn generate_matchups_by_player_load(
    players: &[Player],
    matches_per_player: u32,
) -> Vec<Matchup> {
    generate_matchups_by_player_load_seeded(players, matches_per_player, SeedSource::Roster)
}

/// Player-load generation with an explicit seed source.
///
/// Target is `floor(players * matches_per_player / 4)` matchups. Each attempt shuffles the whole
/// roster and reads it in groups of four (first two vs last two); a group is skipped if its
/// matchup was already used or any of its players is at the cap. Stops at the target or after
/// `target * 100` attempts, returning what it has. No player ever exceeds `matches_per_player`.
pub fn generate_matchups_by_player_load_seeded(
    players: &[Player],
    matches_per_player: u32,
    seed: SeedSource,
) -> Vec<Matchup> {
    if players.len() < MIN_PLAYERS {
        return Vec::new();
    }

    let target = players.len() * matches_per_player as usize / 4;
    let max_attempts = target * ATTEMPTS_PER_MATCH;
    let mut source = seed.sequence(players.len(), matches_per_player);

    let mut matchups: Vec<Matchup> = Vec::with_capacity(target);
    let mut used: HashSet<MatchupKey> = HashSet::new();
    let mut played: HashMap<PlayerId, u32> = HashMap::new();
    let mut attempts = 0;

    while matchups.len() < target && attempts < max_attempts {
        attempts += 1;
        let shuffled = shuffle(players, source.as_mut());

        for group in shuffled.chunks_exact(4) {
            let team1 = Team::pair(group[0].clone(), group[1].clone());
            let team2 = Team::pair(group[2].clone(), group[3].clone());

            let key = MatchupKey::of(&team1, &team2);
            if used.contains(&key) {
                continue;
            }
            let at_cap = group
                .iter()
                .any(|p| played.get(&p.id).copied().unwrap_or(0) >= matches_per_player);
            if at_cap {
                continue;
            }

            for p in group {
                *played.entry(p.id.clone()).or_insert(0) += 1;
            }
            used.insert(key);
            matchups.push(Matchup::new(team1, team2, 1));

            if matchups.len() >= target {
                break;
            }
        }
    }

    if matchups.len() < target {
        log::warn!(
            "Stopped after {} attempts with {} of {} matches ({} players, {} per player)",
            attempts,
            matchups.len(),
            target,
            players.len(),
            matches_per_player
        );
    } else {
        log::debug!(
            "Generated {} matches in {} attempts ({} players, {} per player)",
            matchups.len(),
            attempts,
            players.len(),
            matches_per_player
        );
    }
    matchups
}
