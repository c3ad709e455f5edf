//! Game phase state machine and match timer.

use lasertag_protocol::{GameStart, TimeMessage};
use serde::{Deserialize, Serialize};

use crate::GameError;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Whether a match is in progress.
///
/// ```text
/// NotRunning ──(GameStart)──→ Running ──(timer expiry | stop)──→ NotRunning
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotRunning,
    Running,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRunning => write!(f, "NotRunning"),
            Self::Running => write!(f, "Running"),
        }
    }
}

// ---------------------------------------------------------------------------
// GamePhase
// ---------------------------------------------------------------------------

/// The phase plus everything a GameStart fixes for one match.
///
/// `team_play` is only ever written by [`GamePhase::start`], so it stays
/// constant for the whole Running period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePhase {
    phase: Phase,
    team_play: bool,
    /// Seconds until the match ends, start delay included.
    timer_seconds: u32,
    /// Seconds until the start delay is over. Players stay idle until then.
    start_delay_seconds: u32,
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePhase {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotRunning,
            team_play: false,
            timer_seconds: 0,
            start_delay_seconds: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_team_play(&self) -> bool {
        self.team_play
    }

    /// `true` while running but still inside the start delay.
    pub fn is_start_pending(&self) -> bool {
        self.is_running() && self.start_delay_seconds > 0
    }

    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    /// The timer as it fits the stats message's 16-bit field.
    pub fn wire_timer(&self) -> u16 {
        u16::try_from(self.timer_seconds).unwrap_or(u16::MAX)
    }

    /// Remaining time as a `GameTimer` message.
    pub fn time_message(&self) -> TimeMessage {
        TimeMessage::from_seconds(self.timer_seconds)
    }

    /// `NotRunning → Running`.
    ///
    /// The timer covers the start delay plus the match length.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidPhase`] if a match is already running.
    pub fn start(&mut self, start: &GameStart) -> Result<(), GameError> {
        if self.is_running() {
            return Err(GameError::InvalidPhase {
                phase: self.phase,
                event: "start",
            });
        }
        self.phase = Phase::Running;
        self.team_play = start.team_play;
        self.start_delay_seconds = u32::from(start.start_delay_seconds);
        self.timer_seconds = u32::from(start.game_minutes) * 60 + self.start_delay_seconds;
        tracing::info!(
            team_play = self.team_play,
            timer_seconds = self.timer_seconds,
            "game started"
        );
        Ok(())
    }

    /// `Running → NotRunning`, ahead of the timer.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidPhase`] if no match is running.
    pub fn stop(&mut self) -> Result<(), GameError> {
        if !self.is_running() {
            return Err(GameError::InvalidPhase {
                phase: self.phase,
                event: "stop",
            });
        }
        self.finish();
        Ok(())
    }

    /// Counts the timers down by `elapsed` seconds.
    ///
    /// Returns `true` if the match ran out of time on this tick. Does
    /// nothing while not running.
    pub fn tick(&mut self, elapsed: u32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.start_delay_seconds = self.start_delay_seconds.saturating_sub(elapsed);
        self.timer_seconds = self.timer_seconds.saturating_sub(elapsed);
        if self.timer_seconds == 0 {
            self.finish();
            return true;
        }
        false
    }

    fn finish(&mut self) {
        self.phase = Phase::NotRunning;
        self.timer_seconds = 0;
        self.start_delay_seconds = 0;
        tracing::info!("game finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_start(team_play: bool, minutes: u8, delay: u8) -> GameStart {
        GameStart {
            team_play,
            respawn_seconds: 10,
            game_minutes: minutes,
            start_delay_seconds: delay,
        }
    }

    #[test]
    fn test_new_phase_is_not_running() {
        let phase = GamePhase::new();
        assert_eq!(phase.phase(), Phase::NotRunning);
        assert!(!phase.is_team_play());
        assert_eq!(phase.timer_seconds(), 0);
    }

    #[test]
    fn test_start_sets_timer_and_team_play() {
        let mut phase = GamePhase::new();
        phase.start(&game_start(true, 2, 5)).unwrap();

        assert!(phase.is_running());
        assert!(phase.is_team_play());
        assert_eq!(phase.timer_seconds(), 125);
        assert!(phase.is_start_pending());
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut phase = GamePhase::new();
        phase.start(&game_start(true, 1, 0)).unwrap();

        let result = phase.start(&game_start(false, 1, 0));

        assert!(matches!(
            result,
            Err(GameError::InvalidPhase {
                phase: Phase::Running,
                event: "start"
            })
        ));
        assert!(phase.is_team_play(), "team play is fixed while running");
    }

    #[test]
    fn test_stop_when_not_running_is_rejected() {
        let mut phase = GamePhase::new();
        assert!(matches!(
            phase.stop(),
            Err(GameError::InvalidPhase {
                phase: Phase::NotRunning,
                ..
            })
        ));
    }

    #[test]
    fn test_stop_returns_to_not_running() {
        let mut phase = GamePhase::new();
        phase.start(&game_start(false, 1, 0)).unwrap();
        phase.stop().unwrap();
        assert!(!phase.is_running());
        assert_eq!(phase.timer_seconds(), 0);
    }

    #[test]
    fn test_tick_expires_match() {
        let mut phase = GamePhase::new();
        phase.start(&game_start(false, 1, 3)).unwrap();

        assert!(!phase.tick(2));
        assert!(phase.is_start_pending());
        assert!(!phase.tick(1));
        assert!(!phase.is_start_pending());
        assert_eq!(phase.timer_seconds(), 60);

        assert!(!phase.tick(59));
        assert!(phase.tick(5), "overshooting the timer still expires");
        assert!(!phase.is_running());
        assert!(!phase.tick(1), "ticks after expiry are no-ops");
    }

    #[test]
    fn test_zero_length_match_expires_on_first_tick() {
        let mut phase = GamePhase::new();
        phase.start(&game_start(false, 0, 0)).unwrap();
        assert!(phase.tick(0));
    }

    #[test]
    fn test_wire_timer_fits_longest_match() {
        let mut phase = GamePhase::new();
        phase.start(&game_start(false, 255, 255)).unwrap();
        assert_eq!(phase.timer_seconds(), 255 * 60 + 255);
        assert_eq!(phase.wire_timer(), 15_555);

        let time = phase.time_message();
        assert_eq!(time.total_seconds(), 15_555);
    }

    #[test]
    fn test_wire_timer_saturates_past_u16() {
        let phase = GamePhase {
            phase: Phase::Running,
            timer_seconds: 70_000,
            ..GamePhase::new()
        };
        assert_eq!(phase.wire_timer(), u16::MAX);
        assert_eq!(phase.timer_seconds(), 70_000);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Running.to_string(), "Running");
        assert_eq!(Phase::NotRunning.to_string(), "NotRunning");
    }
}
