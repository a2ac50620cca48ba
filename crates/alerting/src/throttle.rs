//! Announcement throttle
//!
//! Keeps the same warning from being spoken over and over while an obstacle
//! stays in view. Only exact repeats inside the cooldown window are held
//! back; a changed warning always goes through.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{AlertError, Clock, SystemClock};

/// Throttle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum time between repeats of an identical message (seconds)
    pub cooldown_seconds: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 2.0,
        }
    }
}

/// What was last announced, and when
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementState {
    pub last_message: Option<String>,
    pub last_emitted_at: Option<Instant>,
    pub cooldown_seconds: f64,
}

/// Throttle state as seen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottlePhase {
    /// Nothing announced within the cooldown window
    Idle,
    /// An announcement was made within the cooldown window
    CooledDown,
}

/// Decides whether a composed message is spoken
pub struct AnnouncementThrottle {
    state: AnnouncementState,
    cooldown: Duration,
    clock: Box<dyn Clock>,
    emitted: u64,
    suppressed: u64,
}

impl AnnouncementThrottle {
    /// Create a throttle on the system clock
    pub fn new(config: ThrottleConfig) -> Result<Self, AlertError> {
        Self::with_clock(config, SystemClock)
    }

    /// Create a throttle on a custom time source
    pub fn with_clock(config: ThrottleConfig, clock: impl Clock + 'static) -> Result<Self, AlertError> {
        let seconds = config.cooldown_seconds;
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(AlertError::InvalidCooldown(seconds));
        }
        let cooldown =
            Duration::try_from_secs_f64(seconds).map_err(|_| AlertError::InvalidCooldown(seconds))?;

        info!("Creating announcement throttle with {:.1}s cooldown", seconds);
        Ok(Self {
            state: AnnouncementState {
                last_message: None,
                last_emitted_at: None,
                cooldown_seconds: seconds,
            },
            cooldown,
            clock: Box::new(clock),
            emitted: 0,
            suppressed: 0,
        })
    }

    /// Decide whether `message` should be announced at `now`.
    ///
    /// Records the message as the last announcement whenever it returns true.
    pub fn should_emit(&mut self, message: &str, now: Instant, force: bool) -> bool {
        let emit = force
            || self.phase(now) == ThrottlePhase::Idle
            || self.state.last_message.as_deref() != Some(message);

        if emit {
            self.state.last_message = Some(message.to_string());
            self.state.last_emitted_at = Some(now);
            self.emitted += 1;
        } else {
            self.suppressed += 1;
            debug!("Announcement suppressed: repeat inside cooldown: {}", message);
        }

        emit
    }

    /// `should_emit` at the current time of the throttle's clock
    pub fn should_emit_now(&mut self, message: &str, force: bool) -> bool {
        let now = self.clock.now();
        self.should_emit(message, now, force)
    }

    /// Whether the last announcement is still inside the cooldown window
    pub fn phase(&self, now: Instant) -> ThrottlePhase {
        match self.state.last_emitted_at {
            Some(at) if now.saturating_duration_since(at) < self.cooldown => ThrottlePhase::CooledDown,
            _ => ThrottlePhase::Idle,
        }
    }

    pub fn state(&self) -> &AnnouncementState {
        &self.state
    }

    /// Number of approved announcements
    pub fn emitted_count(&self) -> u64 {
        self.emitted
    }

    /// Number of repeats held back
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn throttle() -> AnnouncementThrottle {
        AnnouncementThrottle::new(ThrottleConfig::default()).unwrap()
    }

    #[test]
    fn test_repeat_is_suppressed() {
        let mut throttle = throttle();
        let t = Instant::now();

        assert!(throttle.should_emit("Caution. left obstacle at 2.0 feet", t, false));
        assert!(!throttle.should_emit("Caution. left obstacle at 2.0 feet", t, false));
        assert_eq!(throttle.emitted_count(), 1);
        assert_eq!(throttle.suppressed_count(), 1);
    }

    #[test]
    fn test_changed_message_passes_inside_cooldown() {
        let mut throttle = throttle();
        let t = Instant::now();

        assert!(throttle.should_emit("Caution. left obstacle at 2.0 feet", t, false));
        assert!(throttle.should_emit(
            "Warning. center obstacle at 3.1 feet",
            t + Duration::from_millis(50),
            false
        ));
        assert_eq!(
            throttle.state().last_message.as_deref(),
            Some("Warning. center obstacle at 3.1 feet")
        );
    }

    #[test]
    fn test_repeat_passes_after_cooldown() {
        let mut throttle = throttle();
        let t = Instant::now();

        assert!(throttle.should_emit("Notice. right obstacle at 4.0 feet", t, false));
        assert!(!throttle.should_emit(
            "Notice. right obstacle at 4.0 feet",
            t + Duration::from_millis(1999),
            false
        ));
        assert!(throttle.should_emit(
            "Notice. right obstacle at 4.0 feet",
            t + Duration::from_secs(2),
            false
        ));
    }

    #[test]
    fn test_suppression_does_not_extend_window() {
        let mut throttle = throttle();
        let t = Instant::now();

        assert!(throttle.should_emit("a", t, false));
        assert!(!throttle.should_emit("a", t + Duration::from_millis(1500), false));
        assert_eq!(throttle.state().last_emitted_at, Some(t));
        assert!(throttle.should_emit("a", t + Duration::from_millis(2000), false));
    }

    #[test]
    fn test_force_always_emits() {
        let mut throttle = throttle();
        let t = Instant::now();

        assert!(throttle.should_emit("a", t, true));
        assert!(throttle.should_emit("a", t, true));
        assert_eq!(throttle.state().last_emitted_at, Some(t));
        assert_eq!(throttle.emitted_count(), 2);
    }

    #[test]
    fn test_phases() {
        let mut throttle = throttle();
        let t = Instant::now();

        assert_eq!(throttle.phase(t), ThrottlePhase::Idle);
        throttle.should_emit("a", t, false);
        assert_eq!(throttle.phase(t + Duration::from_secs(1)), ThrottlePhase::CooledDown);
        assert_eq!(throttle.phase(t + Duration::from_secs(2)), ThrottlePhase::Idle);
    }

    #[test]
    fn test_injected_clock() {
        let clock = ManualClock::new();
        let mut throttle =
            AnnouncementThrottle::with_clock(ThrottleConfig { cooldown_seconds: 0.5 }, clock.clone())
                .unwrap();

        assert!(throttle.should_emit_now("a", false));
        clock.advance(Duration::from_millis(300));
        assert!(!throttle.should_emit_now("a", false));
        clock.advance(Duration::from_millis(200));
        assert!(throttle.should_emit_now("a", false));
    }

    #[test]
    fn test_rejects_non_positive_cooldown() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                AnnouncementThrottle::new(ThrottleConfig { cooldown_seconds: bad }),
                Err(AlertError::InvalidCooldown(_))
            ));
        }
    }
}
