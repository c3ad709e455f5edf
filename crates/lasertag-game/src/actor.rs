//! Coordinator actor: a Tokio task that owns the [`Coordinator`].
//!
//! Datagrams may arrive on many tasks (one per radio, one per socket),
//! but the roster must only ever be mutated by one owner. The actor is
//! that owner: everyone else holds a cheap [`CoordinatorHandle`] and
//! sends commands through an mpsc channel, getting answers back on a
//! oneshot reply channel. A snapshot is taken between two commands, so
//! it never sees a half-applied update.

use lasertag_player::{Player, Upsert};
use lasertag_protocol::{Message, MessageToDevice, PlayerId, StatsSnapshot};
use tokio::sync::{mpsc, oneshot};

use crate::{Coordinator, GameError, Outcome};

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Commands sent to the coordinator actor.
enum CoordinatorCommand {
    /// Apply an already decoded message.
    Apply {
        message: Message,
        reply: Reply<Vec<Outcome>>,
    },
    /// Decode a raw datagram, then apply it.
    ApplyDatagram {
        data: Vec<u8>,
        reply: Reply<Vec<Outcome>>,
    },
    /// Register a player, or update a known player's name and team.
    Join {
        player_id: PlayerId,
        name: String,
        team_id: u8,
        reply: oneshot::Sender<Upsert>,
    },
    /// Merge a full player record into the roster.
    Upsert {
        player: Player,
        reply: oneshot::Sender<Upsert>,
    },
    /// Drop a player from the roster.
    Remove {
        player_id: PlayerId,
        reply: Reply<Player>,
    },
    /// Count the match timer down.
    Tick {
        elapsed_seconds: u32,
        reply: oneshot::Sender<Option<Outcome>>,
    },
    /// End the running match ahead of the timer.
    Stop { reply: Reply<Outcome> },
    /// Capture the roster and phase as a stats message.
    Snapshot {
        reply: oneshot::Sender<StatsSnapshot>,
    },
    /// Build the state push for one player's devices.
    DeviceState {
        player_id: PlayerId,
        reply: Reply<MessageToDevice>,
    },
    /// Stop the actor loop.
    Shutdown,
}

/// Handle to a running coordinator actor.
///
/// Cheap to clone; hand one to every task that receives datagrams.
/// Every method returns [`GameError::Unavailable`] once the actor has
/// shut down.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> CoordinatorCommand,
    ) -> Result<T, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)
    }

    /// Applies a decoded message. See [`Coordinator::apply`].
    pub async fn apply(&self, message: Message) -> Result<Vec<Outcome>, GameError> {
        self.request(|reply| CoordinatorCommand::Apply { message, reply })
            .await?
    }

    /// Decodes and applies a raw datagram. See [`Coordinator::apply_datagram`].
    pub async fn apply_datagram(&self, data: Vec<u8>) -> Result<Vec<Outcome>, GameError> {
        self.request(|reply| CoordinatorCommand::ApplyDatagram { data, reply })
            .await?
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        name: impl Into<String>,
        team_id: u8,
    ) -> Result<Upsert, GameError> {
        let name = name.into();
        self.request(|reply| CoordinatorCommand::Join {
            player_id,
            name,
            team_id,
            reply,
        })
        .await
    }

    pub async fn upsert(&self, player: Player) -> Result<Upsert, GameError> {
        self.request(|reply| CoordinatorCommand::Upsert { player, reply })
            .await
    }

    pub async fn remove(&self, player_id: PlayerId) -> Result<Player, GameError> {
        self.request(|reply| CoordinatorCommand::Remove { player_id, reply })
            .await?
    }

    /// Advances the match timer.
    pub async fn tick(&self, elapsed_seconds: u32) -> Result<Option<Outcome>, GameError> {
        self.request(|reply| CoordinatorCommand::Tick {
            elapsed_seconds,
            reply,
        })
        .await
    }

    /// Ends the running match. See [`Coordinator::stop`].
    pub async fn stop(&self) -> Result<Outcome, GameError> {
        self.request(|reply| CoordinatorCommand::Stop { reply })
            .await?
    }

    /// A consistent copy of the roster and phase.
    pub async fn snapshot(&self) -> Result<StatsSnapshot, GameError> {
        self.request(|reply| CoordinatorCommand::Snapshot { reply })
            .await
    }

    pub async fn device_state(&self, player_id: PlayerId) -> Result<MessageToDevice, GameError> {
        self.request(|reply| CoordinatorCommand::DeviceState { player_id, reply })
            .await?
    }

    /// Tells the actor to stop. Commands already queued ahead of this
    /// one are still processed.
    pub async fn shutdown(&self) -> Result<(), GameError> {
        self.sender
            .send(CoordinatorCommand::Shutdown)
            .await
            .map_err(|_| GameError::Unavailable)
    }
}

/// The actor loop state. Runs inside a Tokio task.
struct CoordinatorActor {
    coordinator: Coordinator,
    receiver: mpsc::Receiver<CoordinatorCommand>,
}

impl CoordinatorActor {
    async fn run(mut self) {
        tracing::info!("coordinator actor started");

        while let Some(cmd) = self.receiver.recv().await {
            let c = &mut self.coordinator;
            match cmd {
                CoordinatorCommand::Apply { message, reply } => {
                    let _ = reply.send(c.apply(&message));
                }
                CoordinatorCommand::ApplyDatagram { data, reply } => {
                    let _ = reply.send(c.apply_datagram(&data));
                }
                CoordinatorCommand::Join {
                    player_id,
                    name,
                    team_id,
                    reply,
                } => {
                    let _ = reply.send(c.join(player_id, &name, team_id));
                }
                CoordinatorCommand::Upsert { player, reply } => {
                    let _ = reply.send(c.upsert(player));
                }
                CoordinatorCommand::Remove { player_id, reply } => {
                    let _ = reply.send(c.leave(player_id));
                }
                CoordinatorCommand::Tick {
                    elapsed_seconds,
                    reply,
                } => {
                    let _ = reply.send(c.tick(elapsed_seconds));
                }
                CoordinatorCommand::Stop { reply } => {
                    let _ = reply.send(c.stop());
                }
                CoordinatorCommand::Snapshot { reply } => {
                    let _ = reply.send(c.snapshot());
                }
                CoordinatorCommand::DeviceState { player_id, reply } => {
                    let _ = reply.send(c.device_state(player_id));
                }
                CoordinatorCommand::Shutdown => {
                    tracing::info!(players = c.roster().len(), "coordinator shutting down");
                    break;
                }
            }
        }

        tracing::info!("coordinator actor stopped");
    }
}

/// Spawns the actor task and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it is full, senders
/// wait.
pub fn spawn_coordinator(coordinator: Coordinator, channel_size: usize) -> CoordinatorHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = CoordinatorActor {
        coordinator,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    CoordinatorHandle { sender: tx }
}
