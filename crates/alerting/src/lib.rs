//! Alerting System
//!
//! Turns the priority obstacle into a graded spoken warning and decides
//! whether it should be announced now.

mod clock;
mod composer;
mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use composer::{Alert, AlertComposer, UrgencyTier};
pub use throttle::{AnnouncementState, AnnouncementThrottle, ThrottleConfig, ThrottlePhase};

use thiserror::Error;

/// Alerting error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    #[error("Cooldown must be a positive number of seconds, got {0}")]
    InvalidCooldown(f64),
}
