//! The coordinator: routes decoded messages into player state.
//!
//! A [`Coordinator`] owns the config, the roster and the game phase. It
//! is the single authoritative mutator: every report from a wearable
//! goes through [`Coordinator::apply`], which turns it into player-state
//! transitions and returns what happened as a list of [`Outcome`]s. It
//! never writes to the network; the game loop decides what to broadcast.

use lasertag_player::{GameConfig, Player, PlayerError, Roster, Upsert};
use lasertag_protocol::{
    decode, EventToServer, GameStart, Message, MessageToDevice, MessageType, PlayerId,
    PlayerStatus, StatsSnapshot, TimeMessage, NO_TEAM,
};

use crate::{snapshot, GameError, GamePhase};

/// Something the coordinator did in response to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A match began; every player was respawned with a zero score.
    Started { players: usize },
    /// The match ended (game over message or timer expiry).
    Stopped,
    /// `target` took damage from `shooter` and now has `health` left.
    Hit {
        target: PlayerId,
        shooter: PlayerId,
        health: u8,
    },
    /// The hit was fatal. `killer` got a point.
    Killed { victim: PlayerId, killer: PlayerId },
    /// Same-team hit in team play. Nothing changed.
    FriendlyFire { target: PlayerId, shooter: PlayerId },
    Shot { shooter: PlayerId, bullets_left: u8 },
    Reloaded { player: PlayerId },
    Respawned { player: PlayerId },
    /// A received stats message was merged into the roster.
    RosterSynced { inserted: usize, merged: usize },
    /// The message carries no state change here.
    Ignored(MessageType),
}

/// Owns all mutable game state for one session.
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: GameConfig,
    roster: Roster,
    phase: GamePhase,
}

impl Coordinator {
    /// Creates an idle coordinator with an empty roster.
    ///
    /// # Errors
    /// Returns [`GameError::Player`] if the config doesn't validate.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            roster: Roster::new(),
            phase: GamePhase::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    // -- Roster membership --

    /// Registers a player, or updates an existing record.
    ///
    /// Outside a match a new player joins dead and comes alive at the next
    /// GameStart. During a match they join fully spawned. A known id only
    /// gets its team and (non-empty) name updated; health, ammo and score
    /// are left alone.
    pub fn join(&mut self, id: PlayerId, name: &str, team_id: u8) -> Upsert {
        if let Some(existing) = self.roster.get_mut(id) {
            if !name.is_empty() {
                existing.name = name.to_string();
            }
            existing.team_id = team_id;
            tracing::debug!(player_id = %id, team_id, "player rejoined");
            return Upsert::Merged;
        }

        let player = if self.phase.is_running() {
            Player::new(id, &self.config)
        } else {
            Player::unjoined(id, &self.config)
        };
        self.roster.upsert(player.with_name(name).with_team(team_id))
    }

    /// Merges an externally built player record into the roster.
    pub fn upsert(&mut self, player: Player) -> Upsert {
        self.roster.upsert(player)
    }

    /// # Errors
    /// Returns [`GameError::Player`] if the id is unknown.
    pub fn leave(&mut self, id: PlayerId) -> Result<Player, GameError> {
        Ok(self.roster.remove(id)?)
    }

    // -- Message routing --

    /// Decodes one datagram and applies it.
    ///
    /// # Errors
    /// Returns [`GameError::Protocol`] if the datagram doesn't decode,
    /// otherwise whatever [`Coordinator::apply`] returns.
    pub fn apply_datagram(&mut self, data: &[u8]) -> Result<Vec<Outcome>, GameError> {
        let message = decode(data).inspect_err(|e| {
            tracing::debug!(len = data.len(), error = %e, "discarding datagram");
        })?;
        self.apply(&message)
    }

    /// Applies one decoded message to the game state.
    ///
    /// # Errors
    /// - [`GameError::InvalidPhase`] for a GameStart during a match, or a
    ///   GameOver outside one.
    /// - [`GameError::Player`] if a report names an unknown player.
    pub fn apply(&mut self, message: &Message) -> Result<Vec<Outcome>, GameError> {
        match message {
            Message::GameStart(start) => {
                self.phase.start(start)?;
                for player in self.roster.iter_mut() {
                    player.score = 0;
                    player.respawn(&self.config);
                }
                Ok(vec![Outcome::Started {
                    players: self.roster.len(),
                }])
            }
            Message::EventIn(event) if event.kind == MessageType::GameOver => {
                self.phase.stop()?;
                Ok(vec![Outcome::Stopped])
            }
            Message::EventToServer(report) => self.apply_report(report),
            Message::StatsSnapshot(stats) => Ok(vec![self.sync_roster(stats)]),
            other => Ok(vec![Outcome::Ignored(other.message_type())]),
        }
    }

    fn apply_report(&mut self, report: &EventToServer) -> Result<Vec<Outcome>, GameError> {
        let player_id = report.player_id;
        match report.kind {
            MessageType::HitReport | MessageType::KillReport => self.apply_hit(report),
            MessageType::ShotReport => {
                let bullets_left = self
                    .roster
                    .with_player(player_id, |p| {
                        p.consume_bullet();
                        p.bullets_left
                    })
                    .inspect_err(|_| warn_unknown(player_id))?;
                Ok(vec![Outcome::Shot {
                    shooter: player_id,
                    bullets_left,
                }])
            }
            MessageType::ReloadReport => {
                let config = &self.config;
                self.roster
                    .with_player(player_id, |p| p.reload(config))
                    .inspect_err(|_| warn_unknown(player_id))?;
                Ok(vec![Outcome::Reloaded { player: player_id }])
            }
            MessageType::RespawnReport => {
                let config = &self.config;
                self.roster
                    .with_player(player_id, |p| p.respawn(config))
                    .inspect_err(|_| warn_unknown(player_id))?;
                tracing::info!(%player_id, "player respawned");
                Ok(vec![Outcome::Respawned { player: player_id }])
            }
            kind => Ok(vec![Outcome::Ignored(kind)]),
        }
    }

    /// The reporter is the target; `other_player_id` is the shooter.
    ///
    /// Damage comes from the shooter's record, not from the reported
    /// health, which is only checked against our own result.
    fn apply_hit(&mut self, report: &EventToServer) -> Result<Vec<Outcome>, GameError> {
        let target = report.player_id;
        let shooter = report.other_player_id;

        if !self.phase.is_running() || self.phase.is_start_pending() {
            tracing::debug!(%target, %shooter, "hit outside a running game, ignoring");
            return Ok(vec![Outcome::Ignored(report.kind)]);
        }

        let Some(shooter_player) = self.roster.get(shooter) else {
            warn_unknown(shooter);
            return Err(PlayerError::PlayerNotFound(shooter).into());
        };
        let damage = shooter_player.damage;
        let shooter_team = shooter_player.team_id;

        let target_team = self
            .roster
            .get(target)
            .map(|p| p.team_id)
            .ok_or_else(|| {
                warn_unknown(target);
                PlayerError::PlayerNotFound(target)
            })?;

        if self.phase.is_team_play() && shooter_team != NO_TEAM && shooter_team == target_team {
            tracing::debug!(%target, %shooter, team_id = shooter_team, "friendly fire ignored");
            return Ok(vec![Outcome::FriendlyFire { target, shooter }]);
        }

        let (killed, health) = self.roster.with_player(target, |p| {
            let killed = p.apply_damage(damage);
            (killed, p.health)
        })?;

        if health != report.health {
            tracing::warn!(
                %target,
                reported = report.health,
                computed = health,
                "reported health disagrees, keeping computed value"
            );
        }

        let mut outcomes = vec![Outcome::Hit {
            target,
            shooter,
            health,
        }];

        if killed {
            self.roster.with_player(shooter, |p| p.add_score(1))?;
            tracing::info!(victim = %target, killer = %shooter, "player killed");
            outcomes.push(Outcome::Killed {
                victim: target,
                killer: shooter,
            });
        }

        Ok(outcomes)
    }

    /// A record whose score is the saturated wire image of ours keeps our
    /// wider score; any other score replaces it.
    fn sync_roster(&mut self, stats: &StatsSnapshot) -> Outcome {
        let mut inserted = 0;
        let mut merged = 0;
        for record in &stats.players {
            let mut incoming = Player::from_record(record);
            if let Some(existing) = self.roster.get(record.id) {
                if existing.wire_score() == record.score {
                    incoming.score = existing.score;
                }
            }
            match self.roster.upsert(incoming) {
                Upsert::Inserted => inserted += 1,
                Upsert::Merged => merged += 1,
            }
        }
        Outcome::RosterSynced { inserted, merged }
    }

    // -- Timer --

    /// Advances the match timer. Returns [`Outcome::Stopped`] when the
    /// match runs out of time on this tick.
    pub fn tick(&mut self, elapsed_seconds: u32) -> Option<Outcome> {
        self.phase.tick(elapsed_seconds).then_some(Outcome::Stopped)
    }

    /// Ends the match early.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidPhase`] if no match is running.
    pub fn stop(&mut self) -> Result<Outcome, GameError> {
        self.phase.stop()?;
        Ok(Outcome::Stopped)
    }

    // -- Outbound views --

    /// Captures the roster and phase as a stats message.
    pub fn snapshot(&self) -> StatsSnapshot {
        snapshot::capture(&self.roster, &self.phase)
    }

    pub fn time_message(&self) -> TimeMessage {
        self.phase.time_message()
    }

    /// The GameStart this session's config describes.
    pub fn start_message(&self, team_play: bool, start_delay_seconds: u8) -> GameStart {
        self.config.game_start(team_play, start_delay_seconds)
    }

    /// Builds the state push for one player's devices.
    ///
    /// # Errors
    /// Returns [`GameError::Player`] if the id is unknown.
    pub fn device_state(&self, id: PlayerId) -> Result<MessageToDevice, GameError> {
        let player = self
            .roster
            .get(id)
            .ok_or(PlayerError::PlayerNotFound(id))?;
        Ok(player.device_message(self.status_of(player)))
    }

    fn status_of(&self, player: &Player) -> PlayerStatus {
        if !self.phase.is_running() || self.phase.is_start_pending() {
            PlayerStatus::Idle
        } else if player.is_alive() {
            PlayerStatus::InGame
        } else {
            PlayerStatus::Dead
        }
    }
}

fn warn_unknown(player_id: PlayerId) {
    tracing::warn!(%player_id, "report names unknown player");
}
