//! Player state for laser-tag games.
//!
//! This crate owns the mutable side of the game:
//!
//! 1. **Player records**: health, ammo, score and team for one player
//!    ([`Player`]), with saturating transitions that never go negative.
//! 2. **Tunables**: the per-session limits those transitions read
//!    ([`GameConfig`]).
//! 3. **The roster**: every player the coordinator knows about, keyed
//!    by id ([`Roster`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Game layer (above)  ← routes decoded messages to roster operations
//!     ↕
//! Player layer (this crate)  ← owns health/ammo/score invariants
//!     ↕
//! Protocol layer (below)  ← provides PlayerId, PlayerRecord, EventToServer
//! ```

mod config;
mod error;
mod player;
mod roster;

pub use config::GameConfig;
pub use error::PlayerError;
pub use player::Player;
pub use roster::{Roster, Upsert};
