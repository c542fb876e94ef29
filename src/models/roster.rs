//! Roster: the player list a schedule is generated from.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Player name cannot be empty")]
    EmptyName,
    /// Names are unique, case-insensitive.
    #[error("A player named {0:?} already exists")]
    DuplicateName(String),
    #[error("A player with id {0} already exists")]
    DuplicateId(PlayerId),
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    #[error("Could not read roster CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Add a player with a fresh id. Returns the new player's id.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, RosterError> {
        self.insert(Player::new(name.trim()))
    }

    /// Add a player that already carries an id.
    pub fn insert(&mut self, player: Player) -> Result<PlayerId, RosterError> {
        let name = player.name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(RosterError::DuplicateName(name.to_string()));
        }
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(RosterError::DuplicateId(player.id));
        }
        let player = Player::with_id(player.id, name);
        let id = player.id.clone();
        self.players.push(player);
        Ok(id)
    }

    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player, RosterError> {
        let idx = self
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| RosterError::PlayerNotFound(id.clone()))?;
        Ok(self.players.remove(idx))
    }

    /// Read a roster from CSV: one player per row, `name[,id]`. A leading `name` header row is
    /// skipped; rows without an id get a random one.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, RosterError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut roster = Self::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let name = record.get(0).unwrap_or("");
            let id = record.get(1).filter(|id| !id.is_empty());
            if row == 0 && name.eq_ignore_ascii_case("name") {
                continue;
            }
            if name.is_empty() && id.is_none() {
                continue;
            }
            let player = match id {
                Some(id) => Player::with_id(id, name),
                None => Player::new(name),
            };
            roster.insert(player)?;
        }
        log::debug!("Imported {} players from CSV", roster.len());
        Ok(roster)
    }
}

impl From<Vec<Player>> for Roster {
    /// Wraps players as-is; duplicates are caught when a schedule is built.
    fn from(players: Vec<Player>) -> Self {
        Self { players }
    }
}
