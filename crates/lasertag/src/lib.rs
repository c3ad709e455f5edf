//! # Lasertag
//!
//! Wire protocol and authoritative player state for laser-tag wearables.
//!
//! Guns and vests talk to a game coordinator over short binary datagrams.
//! This crate bundles the three layers that make sense of them:
//!
//! - [`protocol`]: the message catalog and the binary codec.
//! - [`player`]: per-player state, the roster, and game config.
//! - [`game`]: the game phase, roster snapshots, and the coordinator that
//!   routes decoded reports into player state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lasertag::prelude::*;
//!
//! # fn main() -> Result<(), LasertagError> {
//! let mut coordinator = Coordinator::new(GameConfig::default())?;
//! coordinator.join(PlayerId(1), "alice", 1);
//!
//! // A ShotReport from player 1.
//! let outcomes = coordinator.apply_datagram(&[0x12, 1, 0, 100, 0, 7])?;
//! println!("{outcomes:?}");
//!
//! let bytes = encode(&Message::from(coordinator.snapshot()));
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::LasertagError;

pub use lasertag_game as game;
pub use lasertag_player as player;
pub use lasertag_protocol as protocol;

/// The types most callers need, in one import.
pub mod prelude {
    pub use crate::LasertagError;
    pub use lasertag_game::{
        spawn_coordinator, Coordinator, CoordinatorHandle, GameError, GamePhase, LastSnapshot,
        Outcome, Phase,
    };
    pub use lasertag_player::{GameConfig, Player, PlayerError, Roster, Upsert};
    pub use lasertag_protocol::{
        decode, encode, Codec, Message, MessageType, PlayerId, PlayerRecord, PlayerStatus,
        ProtocolError, StatsSnapshot,
    };
}
