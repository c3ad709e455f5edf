//! Per-session tunables.

use lasertag_protocol::GameStart;
use serde::{Deserialize, Serialize};

use crate::PlayerError;

/// Limits and timings for one game session.
///
/// Loaded by whoever hosts the coordinator (a settings file, a lobby
/// screen) and handed in at session start. Fields missing from a
/// serialized config fall back to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Health a player (re)spawns with. Must be non-zero.
    pub max_health: u8,

    /// Bullets in a full magazine.
    pub magazine_size: u8,

    /// Wait between death and respawn.
    pub respawn_seconds: u8,

    /// Match length.
    pub game_minutes: u8,

    /// Damage a new player's shots deal per hit.
    pub hit_damage: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            magazine_size: 8,
            respawn_seconds: 10,
            game_minutes: 15,
            hit_damage: 25,
        }
    }
}

impl GameConfig {
    /// Checks the config can drive a game.
    ///
    /// # Errors
    /// Returns [`PlayerError::InvalidConfig`] if `max_health` is zero,
    /// since a player would spawn dead.
    pub fn validate(&self) -> Result<(), PlayerError> {
        if self.max_health == 0 {
            return Err(PlayerError::InvalidConfig(
                "max_health must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Match length in seconds.
    pub fn game_seconds(&self) -> u32 {
        u32::from(self.game_minutes) * 60
    }

    /// The GameStart announcing a match with these timings.
    pub fn game_start(&self, team_play: bool, start_delay_seconds: u8) -> GameStart {
        GameStart {
            team_play,
            respawn_seconds: self.respawn_seconds,
            game_minutes: self.game_minutes,
            start_delay_seconds,
        }
    }
}
