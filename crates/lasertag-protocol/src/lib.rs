//! Wire protocol for the laser-tag wearables.
//!
//! This crate defines the "language" spoken between guns, vests and the
//! game coordinator:
//!
//! - **Catalog** ([`MessageType`], [`Shape`], [`shape_for`]): every
//!   discriminator byte, its layout, and who may send it.
//! - **Messages** ([`Message`] and its payload structs): the typed
//!   values the rest of the system works with.
//! - **Codec** ([`encode`], [`decode`], the [`Codec`] trait): how those
//!   messages become datagram bytes.
//! - **Errors** ([`ProtocolError`]): why a datagram was rejected.
//!
//! # Architecture
//!
//! The protocol layer sits between the radio (raw bytes) and player
//! state. It knows nothing about sockets or players' health, only how
//! to classify and (de)serialize one datagram.
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Player state (Roster)
//! ```

mod catalog;
mod codec;
mod error;
mod message;
mod types;

pub use catalog::{
    direction_of, roster_record_len, shape_for, CatalogEntry, Field, MessageType, Shape,
    ShapeKind, MAX_NAME_LEN, MAX_PLAYERS,
};
pub use codec::{decode, encode, encoded_len, BinaryCodec, Codec};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::{
    EventIn, EventToServer, GameStart, Message, MessageToDevice, Signal, StatsSnapshot,
    TimeMessage,
};
pub use types::{Direction, PlayerId, PlayerRecord, PlayerStatus, NO_TEAM};
