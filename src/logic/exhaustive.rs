//! Every-team-against-every-team generation ("matches per matchup").

use crate::logic::MIN_PLAYERS;
use crate::models::{Matchup, Player, Team};

/// All teams of two, in (i, j) index order with i < j over `players`.
pub fn enumerate_teams(players: &[Player]) -> Vec<Team> {
    let mut teams = Vec::with_capacity(players.len() * players.len().saturating_sub(1) / 2);
    for (i, p1) in players.iter().enumerate() {
        for p2 in &players[i + 1..] {
            teams.push(Team::pair(p1.clone(), p2.clone()));
        }
    }
    teams
}

/// Generate one matchup for every pair of teams that share no player, each holding
/// `matches_per_matchup` unplayed matches.
///
/// 1. Enumerate teams in (i, j) order.
/// 2. Walk team pairs in the same (i, j) order, skipping pairs with a common player.
///
/// Fewer than 4 players gives an empty schedule. Zero matches per matchup gives matchups with no
/// matches; callers reject that before calling.
pub fn generate_matchups(players: &[Player], matches_per_matchup: u32) -> Vec<Matchup> {
    if players.len() < MIN_PLAYERS {
        return Vec::new();
    }

    let teams = enumerate_teams(players);
    let mut matchups = Vec::new();
    for (i, team1) in teams.iter().enumerate() {
        for team2 in &teams[i + 1..] {
            if team1.shares_player_with(team2) {
                continue;
            }
            matchups.push(Matchup::new(
                team1.clone(),
                team2.clone(),
                matches_per_matchup,
            ));
        }
    }

    log::debug!(
        "Generated {} matchups from {} teams ({} players, {} per matchup)",
        matchups.len(),
        teams.len(),
        players.len(),
        matches_per_matchup
    );
    matchups
}
