//! Game layer for the laser-tag coordinator.
//!
//! - [`GamePhase`]: whether a match runs, team play, and the match timer.
//! - [`Coordinator`]: the single owner of roster and phase. Decoded
//!   reports go in, [`Outcome`]s come out.
//! - [`CoordinatorHandle`]: the coordinator behind a Tokio actor, for
//!   when datagrams arrive on many tasks.
//! - [`snapshot`]: capturing `FullStats` messages and the type-only
//!   comparison used by the last-snapshot slot.
//!
//! ```text
//! datagram → decode → Coordinator::apply → Roster / GamePhase
//!                                        → Vec<Outcome> (for the game loop)
//! ```

mod actor;
mod coordinator;
mod error;
mod phase;
pub mod snapshot;

pub use actor::{spawn_coordinator, CoordinatorHandle};
pub use coordinator::{Coordinator, Outcome};
pub use error::GameError;
pub use phase::{GamePhase, Phase};
pub use snapshot::{capture, snapshot_eq, LastSnapshot, SnapshotKey};
