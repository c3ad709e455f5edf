//! A single player's authoritative record.
//!
//! Every transition here is total. Health and ammo saturate at zero
//! instead of failing, because by the time a hit reaches us the peer
//! has already acted on it and the wire has no way to say "invalid".

use std::cmp::Ordering;

use lasertag_protocol::{
    EventIn, EventToServer, MessageToDevice, MessageType, PlayerId, PlayerRecord, PlayerStatus,
    NO_TEAM,
};
use serde::{Deserialize, Serialize};

use crate::GameConfig;

/// One player's state for the current session.
///
/// `PartialEq` compares every field. Two values describe the *same
/// player* when their ids match; use [`Player::same_entity`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub health: u8,
    /// Wider than the wire's signed byte; see [`Player::wire_score`].
    pub score: i32,
    /// `0` means no team.
    pub team_id: u8,
    /// Damage this player's shots deal per hit.
    pub damage: u8,
    pub bullets_left: u8,
    pub name: String,
}

impl Player {
    /// A freshly spawned player: full health, full magazine, no score.
    pub fn new(id: PlayerId, config: &GameConfig) -> Self {
        Self {
            id,
            health: config.max_health,
            score: 0,
            team_id: NO_TEAM,
            damage: config.hit_damage,
            bullets_left: config.magazine_size,
            name: String::new(),
        }
    }

    /// A player known to the coordinator but not yet in a game.
    ///
    /// Health is zero so they don't count as alive until the first
    /// respawn.
    pub fn unjoined(id: PlayerId, config: &GameConfig) -> Self {
        Self {
            health: 0,
            ..Self::new(id, config)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_team(mut self, team_id: u8) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn with_damage(mut self, damage: u8) -> Self {
        self.damage = damage;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn has_bullets(&self) -> bool {
        self.bullets_left > 0
    }

    // -- Transitions --

    /// Takes a hit. Health saturates at zero.
    ///
    /// Returns `true` if this hit killed the player (alive before, dead
    /// after). Hitting an already dead player returns `false`.
    pub fn apply_damage(&mut self, amount: u8) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Fires one round. With an empty magazine this does nothing;
    /// refusing the shot is the caller's call.
    pub fn consume_bullet(&mut self) {
        self.bullets_left = self.bullets_left.saturating_sub(1);
    }

    /// Refills the magazine. Works dead or alive.
    pub fn reload(&mut self, config: &GameConfig) {
        self.bullets_left = config.magazine_size;
    }

    /// Full health and a full magazine.
    ///
    /// Unconditional: waiting out the respawn timer is the caller's job.
    pub fn respawn(&mut self, config: &GameConfig) {
        self.health = config.max_health;
        self.bullets_left = config.magazine_size;
    }

    /// Adds to the score, saturating at the `i32` bounds.
    pub fn add_score(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta);
    }

    /// Takes the authoritative stats from `other`.
    ///
    /// `id` and `bullets_left` are kept. `name` is only taken when
    /// `other` has one, so an update from a source that doesn't know
    /// names can't blank out a known one.
    pub fn merge_from(&mut self, other: &Player) {
        self.health = other.health;
        self.score = other.score;
        self.team_id = other.team_id;
        self.damage = other.damage;
        if !other.name.is_empty() {
            self.name.clone_from(&other.name);
        }
    }

    // -- Identity and ordering --

    /// `true` if both values describe the same player, whatever their stats.
    pub fn same_entity(&self, other: &Player) -> bool {
        self.id == other.id
    }

    /// Leaderboard order: higher score first. Ties compare equal, so a
    /// stable sort keeps their existing order.
    pub fn leaderboard_cmp(&self, other: &Player) -> Ordering {
        other.score.cmp(&self.score)
    }

    // -- Wire views --

    /// The score as it fits in one signed wire byte, saturating.
    pub fn wire_score(&self) -> i8 {
        self.score.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8
    }

    /// Copies this player into a stats-snapshot row.
    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            id: self.id,
            health: self.health,
            score: self.wire_score(),
            team_id: self.team_id,
            damage: self.damage,
            bullets_left: self.bullets_left,
            name: self.name.clone(),
        }
    }

    /// Rebuilds a player from a stats-snapshot row.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            id: record.id,
            health: record.health,
            score: i32::from(record.score),
            team_id: record.team_id,
            damage: record.damage,
            bullets_left: record.bullets_left,
            name: record.name.clone(),
        }
    }

    /// Builds the server-bound report for an event this player just
    /// went through, carrying their post-event stats.
    pub fn report(&self, kind: MessageType, other: PlayerId) -> EventToServer {
        EventToServer {
            kind,
            player_id: self.id,
            other_player_id: other,
            health: self.health,
            score: self.wire_score(),
            bullets_left: self.bullets_left,
        }
    }

    /// Normalizes a raw device event into the report the coordinator
    /// expects, naming the event's counterpart as `other_player_id`.
    ///
    /// Returns `None` for events that are never reported (connects,
    /// empty-magazine clicks, anything server-bound already).
    pub fn report_event(&self, event: &EventIn) -> Option<EventToServer> {
        let kind = event.kind.report_for()?;
        Some(self.report(kind, event.counterpart()))
    }

    /// Builds the state push for this player's gun and vest.
    pub fn device_message(&self, status: PlayerStatus) -> MessageToDevice {
        MessageToDevice {
            player_id: self.id,
            team_id: self.team_id,
            player_state: status.as_byte(),
            bullets_left: self.bullets_left,
        }
    }
}
