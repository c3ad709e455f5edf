//! Error types for the game layer.

use lasertag_player::PlayerError;
use lasertag_protocol::ProtocolError;

use crate::Phase;

/// Errors that can occur while routing messages into game state.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A roster operation failed (usually an unknown player id).
    #[error(transparent)]
    Player(#[from] PlayerError),

    /// A datagram could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The game phase doesn't allow this transition. For example,
    /// stopping a game that isn't running.
    #[error("cannot {event} while game is {phase}")]
    InvalidPhase { phase: Phase, event: &'static str },

    /// The coordinator actor's channel is closed.
    #[error("coordinator is unavailable")]
    Unavailable,
}
