//! Urgency tiers and warning messages

use obstacle_detection::ObstacleObservation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this distance (feet) a warning is a caution
const CAUTION_BELOW_FEET: f64 = 2.5;
/// Below this distance (feet) a warning is a warning, otherwise a notice
const WARNING_BELOW_FEET: f64 = 3.5;

/// Urgency tier, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyTier {
    Caution,
    Warning,
    Notice,
}

impl UrgencyTier {
    /// Tier for an obstacle distance in feet
    pub fn from_distance(distance_feet: f64) -> Self {
        if distance_feet < CAUTION_BELOW_FEET {
            UrgencyTier::Caution
        } else if distance_feet < WARNING_BELOW_FEET {
            UrgencyTier::Warning
        } else {
            UrgencyTier::Notice
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Caution => "Caution",
            UrgencyTier::Warning => "Warning",
            UrgencyTier::Notice => "Notice",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composed warning ready for the throttle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub tier: UrgencyTier,
    pub message: String,
}

/// Builds spoken warnings from obstacle observations
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertComposer;

impl AlertComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose `"<Tier>. <region> obstacle at <feet> feet"`
    pub fn compose(&self, observation: &ObstacleObservation) -> Alert {
        let tier = UrgencyTier::from_distance(observation.distance_feet);
        Alert {
            tier,
            message: format!(
                "{}. {} obstacle at {:.1} feet",
                tier, observation.region, observation.distance_feet
            ),
        }
    }
}
