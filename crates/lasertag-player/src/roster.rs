//! The roster: every player the coordinator knows about.
//!
//! # Concurrency note
//!
//! `Roster` is NOT thread-safe by itself. It is a plain arena owned by
//! one game loop. If several tasks decode datagrams concurrently, route
//! their mutations through a single owner (the coordinator actor in
//! `lasertag-game`, or a mutex) so a snapshot never sees a half-applied
//! update.

use std::collections::HashMap;

use lasertag_protocol::PlayerId;

use crate::{Player, PlayerError};

/// What [`Roster::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The id was new; the player was appended.
    Inserted,
    /// The id was known; its record took the new stats.
    Merged,
}

/// Players keyed by id, in the order they joined.
///
/// Iteration order (what [`Roster::all`] returns and what snapshots
/// copy) is join order, not score order. Use [`Roster::leaderboard`]
/// for display.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    /// Player records in join order.
    players: Vec<Player>,

    /// Index from id to position in `players`. Kept in sync on every
    /// insert and remove.
    index: HashMap<PlayerId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.index.get(&id).map(|&i| &mut self.players[i])
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    /// All players in join order.
    pub fn all(&self) -> &[Player] {
        &self.players
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Adds a player, or merges into the existing record with that id.
    ///
    /// Merging follows [`Player::merge_from`]: the existing record keeps
    /// its slot, its ammo, and its name unless the update has one.
    pub fn upsert(&mut self, player: Player) -> Upsert {
        if let Some(existing) = self.get_mut(player.id) {
            existing.merge_from(&player);
            tracing::debug!(player_id = %player.id, "player record merged");
            return Upsert::Merged;
        }

        let player_id = player.id;
        self.index.insert(player_id, self.players.len());
        self.players.push(player);
        tracing::info!(%player_id, players = self.players.len(), "player joined roster");
        Upsert::Inserted
    }

    /// Removes a player (disconnect, or kicked at session end).
    ///
    /// # Errors
    /// Returns [`PlayerError::PlayerNotFound`] if the id is unknown.
    pub fn remove(&mut self, id: PlayerId) -> Result<Player, PlayerError> {
        let pos = self
            .index
            .remove(&id)
            .ok_or(PlayerError::PlayerNotFound(id))?;
        let player = self.players.remove(pos);

        // Everyone after the removed slot shifted down by one.
        for (i, p) in self.players.iter().enumerate().skip(pos) {
            self.index.insert(p.id, i);
        }

        tracing::info!(player_id = %id, players = self.players.len(), "player left roster");
        Ok(player)
    }

    /// Runs `f` on the player with `id`.
    ///
    /// This is how id-addressed operations (a hit naming a shooter, a
    /// reload report) reach a record.
    ///
    /// # Errors
    /// Returns [`PlayerError::PlayerNotFound`] if the id is unknown.
    pub fn with_player<R>(
        &mut self,
        id: PlayerId,
        f: impl FnOnce(&mut Player) -> R,
    ) -> Result<R, PlayerError> {
        let player = self.get_mut(id).ok_or(PlayerError::PlayerNotFound(id))?;
        Ok(f(player))
    }

    /// Players sorted for display: highest score first, ties in join order.
    pub fn leaderboard(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| a.leaderboard_cmp(b));
        ranked
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Drops every player (session end).
    pub fn clear(&mut self) {
        self.players.clear();
        self.index.clear();
    }
}
