//! The message catalog: every discriminator byte the protocol knows.
//!
//! The first byte of every datagram names its message type. This module
//! is the single registry that maps that byte to:
//!
//! - a [`Shape`]: which fields follow and how wide each one is, and
//! - a [`Direction`]: who is allowed to send it.
//!
//! The codec consults the catalog before touching any other byte, so an
//! unknown discriminator is rejected before we try to interpret garbage.
//!
//! ```text
//! ┌──────┬─────────────────────────────┐
//! │ 0x10 │ 03  07  37  78  04          │   HitReport (EventReport shape)
//! └──────┴─────────────────────────────┘
//!  type    fields in declaration order
//! ```

use serde::{Deserialize, Serialize};

use crate::{Direction, Message};

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// Every discriminator byte in the protocol.
///
/// Values are unique across the whole catalog regardless of direction.
/// Only `Ping` means the same thing both ways.
///
/// The `0x10..=0x14` range holds *reports*: the server-bound echo of a
/// device event, carrying the reporter's post-event stats. Keeping them
/// in their own range means the coordinator never has to guess whether
/// a `GotHit` byte is a 2-byte device event or a 6-byte report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    Ping = 0x01,
    GunShot = 0x02,
    GunReload = 0x03,
    YouHitSomeone = 0x04,
    GotHit = 0x05,
    Respawn = 0x06,
    GameOver = 0x07,
    GameStart = 0x08,
    YouKilled = 0x09,
    YouScored = 0x0A,
    FullStats = 0x0B,
    GunNoBullets = 0x0C,
    DevicePlayerState = 0x0D,
    DeviceConnected = 0x0E,
    DeviceDisconnected = 0x0F,
    HitReport = 0x10,
    KillReport = 0x11,
    ShotReport = 0x12,
    ReloadReport = 0x13,
    RespawnReport = 0x14,
    GameTimer = 0x65,
    ServerDisconnected = 0x66,
}

impl MessageType {
    /// All message types, in discriminator order.
    pub const ALL: [MessageType; 22] = [
        Self::Ping,
        Self::GunShot,
        Self::GunReload,
        Self::YouHitSomeone,
        Self::GotHit,
        Self::Respawn,
        Self::GameOver,
        Self::GameStart,
        Self::YouKilled,
        Self::YouScored,
        Self::FullStats,
        Self::GunNoBullets,
        Self::DevicePlayerState,
        Self::DeviceConnected,
        Self::DeviceDisconnected,
        Self::HitReport,
        Self::KillReport,
        Self::ShotReport,
        Self::ReloadReport,
        Self::RespawnReport,
        Self::GameTimer,
        Self::ServerDisconnected,
    ];

    /// The discriminator byte.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Looks up a discriminator byte. Bytes outside the catalog yield `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_byte() == byte)
    }

    /// The catalog entry for this type.
    pub fn entry(self) -> CatalogEntry {
        use Direction::*;

        let (shape, direction) = match self {
            Self::Ping => (&SIGNAL, Bidirectional),
            Self::GunShot
            | Self::GunReload
            | Self::GotHit
            | Self::GunNoBullets
            | Self::DeviceConnected
            | Self::DeviceDisconnected => (&EVENT, DeviceToServer),
            Self::YouHitSomeone
            | Self::Respawn
            | Self::GameOver
            | Self::YouKilled
            | Self::YouScored => (&EVENT, ServerToDevice),
            Self::GameStart => (&GAME_START, ServerToDevice),
            Self::FullStats => (&STATS, ServerToDevice),
            Self::DevicePlayerState => (&DEVICE_STATE, ServerToDevice),
            Self::HitReport
            | Self::KillReport
            | Self::ShotReport
            | Self::ReloadReport
            | Self::RespawnReport => (&EVENT_REPORT, DeviceToServer),
            Self::GameTimer => (&TIME, ServerToDevice),
            Self::ServerDisconnected => (&SIGNAL, ServerToDevice),
        };

        CatalogEntry {
            message_type: self,
            shape,
            direction,
        }
    }

    /// The shape of messages with this discriminator.
    pub fn shape(self) -> &'static Shape {
        self.entry().shape
    }

    /// Who may send messages with this discriminator.
    pub fn direction(self) -> Direction {
        self.entry().direction
    }

    /// Maps a device event to the report type that carries it to the
    /// coordinator.
    ///
    /// A hit that kills the wearer is reported as `YouKilled` on the
    /// device side, so it maps to `KillReport`. Events with no
    /// server-side meaning (connect/disconnect, empty magazine clicks)
    /// return `None`.
    pub fn report_for(self) -> Option<Self> {
        match self {
            Self::GotHit => Some(Self::HitReport),
            Self::YouKilled => Some(Self::KillReport),
            Self::GunShot => Some(Self::ShotReport),
            Self::GunReload => Some(Self::ReloadReport),
            Self::Respawn => Some(Self::RespawnReport),
            _ => None,
        }
    }

    /// Returns `true` for the server-bound report types.
    pub fn is_report(self) -> bool {
        self.shape().kind == ShapeKind::EventReport
    }
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(byte)
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(0x{:02x})", self, self.as_byte())
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Which layout family a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Signal,
    Time,
    Event,
    EventReport,
    GameStart,
    DeviceState,
    Stats,
}

/// One field after the discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Width in bytes.
    pub width: usize,
}

const fn field(name: &'static str, width: usize) -> Field {
    Field { name, width }
}

/// The byte layout of a message family.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Fixed fields after the discriminator, in wire order.
    pub fields: &'static [Field],
    /// `true` if a player roster follows the fixed fields.
    pub has_roster: bool,
}

impl Shape {
    /// Length of the fixed part, discriminator included.
    ///
    /// For every shape except `Stats` this is the exact datagram length.
    pub fn fixed_len(&self) -> usize {
        1 + self.fields.iter().map(|f| f.width).sum::<usize>()
    }
}

pub static SIGNAL: Shape = Shape {
    kind: ShapeKind::Signal,
    fields: &[],
    has_roster: false,
};

pub static TIME: Shape = Shape {
    kind: ShapeKind::Time,
    fields: &[field("minutes", 1), field("seconds", 1)],
    has_roster: false,
};

pub static EVENT: Shape = Shape {
    kind: ShapeKind::Event,
    fields: &[field("payload", 1)],
    has_roster: false,
};

pub static EVENT_REPORT: Shape = Shape {
    kind: ShapeKind::EventReport,
    fields: &[
        field("player_id", 1),
        field("other_player_id", 1),
        field("health", 1),
        field("score", 1),
        field("bullets_left", 1),
    ],
    has_roster: false,
};

pub static GAME_START: Shape = Shape {
    kind: ShapeKind::GameStart,
    fields: &[
        field("team_play", 1),
        field("respawn_seconds", 1),
        field("game_minutes", 1),
        field("start_delay_seconds", 1),
    ],
    has_roster: false,
};

pub static DEVICE_STATE: Shape = Shape {
    kind: ShapeKind::DeviceState,
    fields: &[
        field("player_id", 1),
        field("team_id", 1),
        field("player_state", 1),
        field("bullets_left", 1),
    ],
    has_roster: false,
};

pub static STATS: Shape = Shape {
    kind: ShapeKind::Stats,
    fields: &[
        field("game_running", 1),
        field("team_play", 1),
        field("timer_seconds", 2),
        field("player_count", 1),
    ],
    has_roster: true,
};

/// Fixed part of one roster record inside a `Stats` message. The name
/// bytes (`name_len` of them) follow directly.
pub static ROSTER_RECORD: &[Field] = &[
    field("id", 1),
    field("health", 1),
    field("score", 1),
    field("team_id", 1),
    field("damage", 1),
    field("bullets_left", 1),
    field("name_len", 1),
];

/// Fixed width of one roster record, name excluded.
pub fn roster_record_len() -> usize {
    ROSTER_RECORD.iter().map(|f| f.width).sum()
}

/// Upper bound on players in one stats message, agreed with the firmware.
pub const MAX_PLAYERS: usize = 32;

/// Upper bound on a player name's encoded length (it has a 1-byte prefix).
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

// ---------------------------------------------------------------------------
// Catalog lookups
// ---------------------------------------------------------------------------

/// One row of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub message_type: MessageType,
    pub shape: &'static Shape,
    pub direction: Direction,
}

/// Returns the shape for a discriminator byte, or `None` if the byte is
/// not in the catalog.
pub fn shape_for(type_byte: u8) -> Option<&'static Shape> {
    MessageType::from_byte(type_byte).map(MessageType::shape)
}

/// Returns who may send the given message.
pub fn direction_of(message: &Message) -> Direction {
    message.message_type().direction()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminators_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for t in MessageType::ALL {
            assert!(seen.insert(t.as_byte()), "{t} registered twice");
        }
    }

    #[test]
    fn test_from_byte_inverts_as_byte() {
        for t in MessageType::ALL {
            assert_eq!(MessageType::from_byte(t.as_byte()), Some(t));
        }
    }

    #[test]
    fn test_bytes_outside_catalog_have_no_shape() {
        let known: Vec<u8> = MessageType::ALL.iter().map(|t| t.as_byte()).collect();
        for byte in 0..=u8::MAX {
            assert_eq!(shape_for(byte).is_some(), known.contains(&byte), "byte {byte:#04x}");
        }
        assert!(shape_for(0x00).is_none());
        assert!(shape_for(0xFF).is_none());
    }

    #[test]
    fn test_fixed_lengths() {
        assert_eq!(SIGNAL.fixed_len(), 1);
        assert_eq!(TIME.fixed_len(), 3);
        assert_eq!(EVENT.fixed_len(), 2);
        assert_eq!(EVENT_REPORT.fixed_len(), 6);
        assert_eq!(GAME_START.fixed_len(), 5);
        assert_eq!(DEVICE_STATE.fixed_len(), 5);
        assert_eq!(STATS.fixed_len(), 6);
        assert_eq!(roster_record_len(), 7);
    }

    #[test]
    fn test_only_ping_is_bidirectional() {
        let both: Vec<_> = MessageType::ALL
            .iter()
            .filter(|t| t.direction() == Direction::Bidirectional)
            .collect();
        assert_eq!(both, vec![&MessageType::Ping]);
    }

    #[test]
    fn test_report_for_targets_report_types() {
        for t in MessageType::ALL {
            if let Some(report) = t.report_for() {
                assert!(report.is_report(), "{t} maps to non-report {report}");
                assert_eq!(report.direction(), Direction::DeviceToServer);
            }
        }
        assert_eq!(MessageType::GotHit.report_for(), Some(MessageType::HitReport));
        assert_eq!(MessageType::DeviceConnected.report_for(), None);
    }

    #[test]
    fn test_try_from_unknown_byte_returns_byte() {
        assert_eq!(MessageType::try_from(0x42), Err(0x42));
        assert_eq!(MessageType::try_from(0x0B), Ok(MessageType::FullStats));
    }

    #[test]
    fn test_hit_report_is_0x10() {
        assert_eq!(MessageType::HitReport.as_byte(), 0x10);
        assert_eq!(MessageType::GameTimer.as_byte(), 101);
    }
}
