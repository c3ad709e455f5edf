//! Error types for the player layer.
//!
//! Numeric clamping (health or ammo hitting zero) is *not* an error.
//! The only failures here are asking for a player who isn't in the
//! roster, and a config the transitions can't work with.

use lasertag_protocol::PlayerId;

/// Errors that can occur during roster and config operations.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// No player with this id is in the roster.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// A `GameConfig` value is outside what the game can run with.
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}
