//! Unified error type for the lasertag crates.

use lasertag_game::GameError;
use lasertag_player::PlayerError;
use lasertag_protocol::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `lasertag` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LasertagError {
    /// A datagram could not be decoded or encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A player or config operation failed.
    #[error(transparent)]
    Player(#[from] PlayerError),

    /// A game-phase or coordinator error.
    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use lasertag_game::Phase;
    use lasertag_protocol::{MessageType, PlayerId};

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::UnknownType(0xEE);
        let lasertag_err: LasertagError = err.into();
        assert!(matches!(lasertag_err, LasertagError::Protocol(_)));
        assert_eq!(lasertag_err.to_string(), "unknown message type 0xee");
    }

    #[test]
    fn test_from_player_error() {
        let err = PlayerError::PlayerNotFound(PlayerId(4));
        let lasertag_err: LasertagError = err.into();
        assert!(matches!(lasertag_err, LasertagError::Player(_)));
        assert!(lasertag_err.to_string().contains("P-4"));
    }

    #[test]
    fn test_from_game_error() {
        let err = GameError::InvalidPhase {
            phase: Phase::NotRunning,
            event: "stop",
        };
        let lasertag_err: LasertagError = err.into();
        assert!(matches!(lasertag_err, LasertagError::Game(_)));
        assert_eq!(
            lasertag_err.to_string(),
            "cannot stop while game is NotRunning"
        );
    }

    #[test]
    fn test_truncated_message_display() {
        let err = ProtocolError::TruncatedMessage {
            message_type: MessageType::HitReport,
            expected: 6,
            actual: 3,
        };
        let lasertag_err: LasertagError = err.into();
        assert!(lasertag_err.to_string().contains("expected 6 bytes, got 3"));
    }
}
