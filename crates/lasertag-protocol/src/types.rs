//! Identity and value types shared by every message on the wire.
//!
//! Everything here is one byte wide on the wire (or built from one-byte
//! fields). The firmware on the gun and vest only knows about bytes, so
//! these types are thin wrappers that keep the Rust side honest about
//! what each byte means.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity for one game session.
///
/// This is a "newtype wrapper" around the single byte the devices use
/// to address a player. Wrapping it means a `PlayerId` can't be mixed
/// up with a team id, a health value, or any of the other bare `u8`s
/// that travel in the same datagram.
///
/// `#[serde(transparent)]` makes `PlayerId(7)` serialize as plain `7`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Team number. `0` means "no team" (free-for-all).
pub const NO_TEAM: u8 = 0;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a message travels.
///
/// The transport layer uses this to decide which socket or queue a
/// message belongs on. A wearable only ever sends `DeviceToServer`
/// messages and only ever expects `ServerToDevice` ones back, with the
/// exception of `Bidirectional` keep-alives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Wearable (gun, vest, phone) → coordinator.
    DeviceToServer,
    /// Coordinator → wearable.
    ServerToDevice,
    /// Either way, same meaning.
    Bidirectional,
}

impl Direction {
    /// Returns `true` if a message with this direction may be sent by a device.
    pub fn sent_by_device(self) -> bool {
        matches!(self, Self::DeviceToServer | Self::Bidirectional)
    }

    /// Returns `true` if a message with this direction may be sent by the coordinator.
    pub fn sent_by_server(self) -> bool {
        matches!(self, Self::ServerToDevice | Self::Bidirectional)
    }
}

// ---------------------------------------------------------------------------
// PlayerStatus
// ---------------------------------------------------------------------------

/// Coarse state pushed to a device in a `MessageToDevice`.
///
/// The gun and vest only need to know enough to pick an LED pattern and
/// decide whether the trigger is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerStatus {
    /// Connected, no game running (or the start delay is still counting).
    Idle = 0,
    /// Game running and the player is alive.
    InGame = 1,
    /// Game running and the player is waiting to respawn.
    Dead = 2,
    /// The coordinator lost the link to the player.
    Offline = 3,
}

impl PlayerStatus {
    /// The byte this status occupies on the wire.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parses a wire byte. Unknown values yield `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Idle),
            1 => Some(Self::InGame),
            2 => Some(Self::Dead),
            3 => Some(Self::Offline),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// One player's row inside a stats snapshot.
///
/// This is the wire view of a player: everything is as narrow as the
/// datagram allows. `score` is a signed byte here even though the
/// coordinator keeps a wider counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub health: u8,
    pub score: i8,
    pub team_id: u8,
    pub damage: u8,
    pub bullets_left: u8,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_player_status_byte_round_trip() {
        for status in [
            PlayerStatus::Idle,
            PlayerStatus::InGame,
            PlayerStatus::Dead,
            PlayerStatus::Offline,
        ] {
            assert_eq!(PlayerStatus::from_byte(status.as_byte()), Some(status));
        }
        assert_eq!(PlayerStatus::from_byte(4), None);
    }

    #[test]
    fn test_direction_senders() {
        assert!(Direction::DeviceToServer.sent_by_device());
        assert!(!Direction::DeviceToServer.sent_by_server());
        assert!(Direction::ServerToDevice.sent_by_server());
        assert!(Direction::Bidirectional.sent_by_device());
        assert!(Direction::Bidirectional.sent_by_server());
    }
}
