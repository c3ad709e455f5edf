//! Roster snapshots and the last-snapshot slot.
//!
//! The coordinator periodically broadcasts a `FullStats` message built by
//! [`capture`]. Game loops that keep "the latest outgoing stats" in a
//! single slot compare snapshots by message type only: any stats message
//! is considered the same as any other, so a newer one simply displaces
//! the older one. That comparison lives here as [`snapshot_eq`] and
//! [`SnapshotKey`], never as `PartialEq` on [`Message`], which stays
//! structural.

use std::hash::{Hash, Hasher};

use lasertag_player::Roster;
use lasertag_protocol::{Message, MessageType, StatsSnapshot};

use crate::GamePhase;

/// Copies the roster (in roster order) and the phase into a stats message.
pub fn capture(roster: &Roster, phase: &GamePhase) -> StatsSnapshot {
    StatsSnapshot {
        game_running: phase.is_running(),
        team_play: phase.is_team_play(),
        timer_seconds: phase.wire_timer(),
        players: roster.all().iter().map(|p| p.to_record()).collect(),
    }
}

/// Type-only equality: two messages are "the same snapshot" when their
/// discriminators match. Contents are ignored.
pub fn snapshot_eq(a: &Message, b: &Message) -> bool {
    a.message_type() == b.message_type()
}

// ---------------------------------------------------------------------------
// SnapshotKey
// ---------------------------------------------------------------------------

/// Hash/Eq key that agrees with [`snapshot_eq`].
///
/// Only the message type goes into the hash, so every stats message lands
/// on the same key.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotKey(MessageType);

impl SnapshotKey {
    pub fn of(message: &Message) -> Self {
        Self(message.message_type())
    }

    pub fn message_type(self) -> MessageType {
        self.0
    }
}

impl PartialEq for SnapshotKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SnapshotKey {}

impl Hash for SnapshotKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_byte().hash(state);
    }
}

// ---------------------------------------------------------------------------
// LastSnapshot
// ---------------------------------------------------------------------------

/// Single-slot holder for the most recent outgoing message of one kind.
#[derive(Debug, Clone, Default)]
pub struct LastSnapshot {
    slot: Option<Message>,
}

impl LastSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `message`.
    ///
    /// An empty slot always accepts. A full slot accepts only a message
    /// that is [`snapshot_eq`] to the held one, and returns `true` when it
    /// replaced something. A message of a different kind is refused and
    /// the held one is kept.
    pub fn offer(&mut self, message: Message) -> bool {
        match &self.slot {
            None => {
                self.slot = Some(message);
                false
            }
            Some(held) if snapshot_eq(held, &message) => {
                self.slot = Some(message);
                true
            }
            Some(held) => {
                tracing::debug!(
                    held = %held.message_type(),
                    offered = %message.message_type(),
                    "snapshot slot refused message of another kind"
                );
                false
            }
        }
    }

    pub fn peek(&self) -> Option<&Message> {
        self.slot.as_ref()
    }

    pub fn take(&mut self) -> Option<Message> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use lasertag_player::{GameConfig, Player};
    use lasertag_protocol::{GameStart, PlayerId, TimeMessage};

    use super::*;

    fn stats(timer_seconds: u16, ids: &[u8]) -> Message {
        let cfg = GameConfig::default();
        Message::from(StatsSnapshot {
            game_running: true,
            team_play: false,
            timer_seconds,
            players: ids
                .iter()
                .map(|&id| Player::new(PlayerId(id), &cfg).to_record())
                .collect(),
        })
    }

    #[test]
    fn test_capture_keeps_roster_order() {
        let cfg = GameConfig::default();
        let mut roster = Roster::new();
        roster.upsert(Player::new(PlayerId(4), &cfg));
        roster.upsert(Player {
            score: 9,
            ..Player::new(PlayerId(2), &cfg)
        });

        let snap = capture(&roster, &GamePhase::new());

        let ids: Vec<u8> = snap.players.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![4, 2], "roster order, not score order");
        assert!(!snap.game_running);
        assert_eq!(snap.timer_seconds, 0);
    }

    #[test]
    fn test_capture_reflects_running_phase() {
        let mut phase = GamePhase::new();
        phase
            .start(&GameStart {
                team_play: true,
                respawn_seconds: 5,
                game_minutes: 1,
                start_delay_seconds: 0,
            })
            .unwrap();

        let snap = capture(&Roster::new(), &phase);

        assert!(snap.game_running);
        assert!(snap.team_play);
        assert_eq!(snap.timer_seconds, 60);
        assert!(snap.players.is_empty());
    }

    #[test]
    fn test_snapshots_with_different_contents_compare_equal() {
        let a = stats(10, &[1, 2]);
        let b = stats(99, &[7]);

        assert!(snapshot_eq(&a, &b));
        assert_eq!(SnapshotKey::of(&a), SnapshotKey::of(&b));
        assert_ne!(a, b, "structural equality is unaffected");

        let mut keys = HashSet::new();
        keys.insert(SnapshotKey::of(&a));
        assert!(!keys.insert(SnapshotKey::of(&b)));
    }

    #[test]
    fn test_non_stats_message_never_equals_snapshot() {
        let snap = stats(10, &[]);
        let time = Message::from(TimeMessage::from_seconds(10));

        assert!(!snapshot_eq(&snap, &time));
        assert_ne!(SnapshotKey::of(&snap), SnapshotKey::of(&time));
    }

    #[test]
    fn test_last_snapshot_replaces_same_kind() {
        let mut last = LastSnapshot::new();
        assert!(!last.offer(stats(10, &[1])), "empty slot stores");
        assert!(last.offer(stats(9, &[1, 2])), "newer snapshot replaces");

        match last.peek() {
            Some(Message::StatsSnapshot(s)) => assert_eq!(s.timer_seconds, 9),
            other => panic!("unexpected slot contents: {other:?}"),
        }
    }

    #[test]
    fn test_last_snapshot_refuses_other_kind() {
        let mut last = LastSnapshot::new();
        last.offer(stats(10, &[]));

        assert!(!last.offer(Message::ping()));
        assert_eq!(
            last.peek().map(Message::message_type),
            Some(MessageType::FullStats)
        );

        assert!(last.take().is_some());
        assert!(last.is_empty());
    }
}
