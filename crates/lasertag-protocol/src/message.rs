//! The closed set of messages exchanged between wearables and the
//! coordinator.
//!
//! [`Message`] is a sum type with one variant per layout family. Variants
//! that share a layout (all the 2-byte device events, all the 6-byte
//! reports) carry their [`MessageType`] as a `kind` field; the others
//! have exactly one discriminator and don't need to store it.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, MessageType, ShapeKind};
use crate::{Direction, PlayerId, PlayerRecord, PlayerStatus};

// ---------------------------------------------------------------------------
// Variant payloads
// ---------------------------------------------------------------------------

/// Keep-alive or bare notification: the discriminator is the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: MessageType,
}

impl Signal {
    pub fn ping() -> Self {
        Self {
            kind: MessageType::Ping,
        }
    }
}

/// Remaining match time, pushed once a second while a game runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeMessage {
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeMessage {
    /// Splits a seconds countdown into minutes and seconds.
    ///
    /// Minutes saturate at 255, which is over four hours of play.
    pub fn from_seconds(total: u32) -> Self {
        Self {
            minutes: u8::try_from(total / 60).unwrap_or(u8::MAX),
            seconds: (total % 60) as u8,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }
}

/// A raw event with one opaque payload byte.
///
/// Coming from a vest this is a hit, and the payload is the shooter's
/// id as read off the infrared beam. Coming from the coordinator the
/// payload names the counterpart (who you hit, who killed you).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIn {
    pub kind: MessageType,
    pub payload: u8,
}

impl EventIn {
    pub fn new(kind: MessageType, payload: u8) -> Self {
        Self { kind, payload }
    }

    /// The payload read as a player id.
    pub fn counterpart(&self) -> PlayerId {
        PlayerId(self.payload)
    }
}

/// A device event normalized into a report for the coordinator.
///
/// `player_id` is the reporter. `other_player_id` is the counterpart
/// from the device event (the shooter, for a hit). The stats are the
/// reporter's values *after* the event was applied locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventToServer {
    pub kind: MessageType,
    pub player_id: PlayerId,
    pub other_player_id: PlayerId,
    pub health: u8,
    pub score: i8,
    pub bullets_left: u8,
}

/// Announces a new match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStart {
    pub team_play: bool,
    pub respawn_seconds: u8,
    pub game_minutes: u8,
    /// Countdown before the match actually begins.
    pub start_delay_seconds: u8,
}

/// State pushed to a specific gun or vest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageToDevice {
    pub player_id: PlayerId,
    pub team_id: u8,
    /// Coarse state byte; see [`PlayerStatus`]. Kept raw so an unknown
    /// value from newer firmware still decodes.
    pub player_state: u8,
    pub bullets_left: u8,
}

impl MessageToDevice {
    pub fn status(&self) -> Option<PlayerStatus> {
        PlayerStatus::from_byte(self.player_state)
    }
}

/// A point-in-time copy of the game phase and the whole roster.
///
/// `PartialEq` here is ordinary structural equality. The "any two stats
/// messages are the same" comparison the game loop uses for its
/// last-snapshot slot lives in `lasertag-game` as a separate function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub game_running: bool,
    pub team_play: bool,
    pub timer_seconds: u16,
    pub players: Vec<PlayerRecord>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Any message the protocol can carry.
///
/// `#[serde(tag = "type", content = "data")]` gives the JSON debug
/// codec an adjacently tagged shape:
///   `{ "type": "Time", "data": { "minutes": 4, "seconds": 59 } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Message {
    Signal(Signal),
    Time(TimeMessage),
    EventIn(EventIn),
    EventToServer(EventToServer),
    GameStart(GameStart),
    MessageToDevice(MessageToDevice),
    StatsSnapshot(StatsSnapshot),
}

impl Message {
    pub fn ping() -> Self {
        Self::Signal(Signal::ping())
    }

    /// The discriminator this message is sent with.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Signal(s) => s.kind,
            Self::Time(_) => MessageType::GameTimer,
            Self::EventIn(e) => e.kind,
            Self::EventToServer(e) => e.kind,
            Self::GameStart(_) => MessageType::GameStart,
            Self::MessageToDevice(_) => MessageType::DevicePlayerState,
            Self::StatsSnapshot(_) => MessageType::FullStats,
        }
    }

    pub fn direction(&self) -> Direction {
        catalog::direction_of(self)
    }

    /// Encoded length without the roster, known from the type alone.
    pub fn fixed_len(&self) -> usize {
        self.message_type().shape().fixed_len()
    }

    /// Returns `true` if the `kind` stored in the variant belongs to
    /// the variant's layout family.
    ///
    /// Encoding a message that isn't well formed still produces bytes,
    /// but the peer will decode them as a different shape.
    pub fn is_well_formed(&self) -> bool {
        let expected = match self {
            Self::Signal(_) => ShapeKind::Signal,
            Self::Time(_) => ShapeKind::Time,
            Self::EventIn(_) => ShapeKind::Event,
            Self::EventToServer(_) => ShapeKind::EventReport,
            Self::GameStart(_) => ShapeKind::GameStart,
            Self::MessageToDevice(_) => ShapeKind::DeviceState,
            Self::StatsSnapshot(_) => ShapeKind::Stats,
        };
        self.message_type().shape().kind == expected
    }
}

impl From<Signal> for Message {
    fn from(m: Signal) -> Self {
        Self::Signal(m)
    }
}

impl From<TimeMessage> for Message {
    fn from(m: TimeMessage) -> Self {
        Self::Time(m)
    }
}

impl From<EventIn> for Message {
    fn from(m: EventIn) -> Self {
        Self::EventIn(m)
    }
}

impl From<EventToServer> for Message {
    fn from(m: EventToServer) -> Self {
        Self::EventToServer(m)
    }
}

impl From<GameStart> for Message {
    fn from(m: GameStart) -> Self {
        Self::GameStart(m)
    }
}

impl From<MessageToDevice> for Message {
    fn from(m: MessageToDevice) -> Self {
        Self::MessageToDevice(m)
    }
}

impl From<StatsSnapshot> for Message {
    fn from(m: StatsSnapshot) -> Self {
        Self::StatsSnapshot(m)
    }
}
