//! Danger zone configuration

use depth_capture::feet_to_mm;
use serde::Serialize;

use crate::DetectionError;

/// Distance band considered hazardous, and how much of a region must fall
/// inside it before the region counts as obstructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DangerZoneConfig {
    /// Near edge of the band (millimeters, inclusive)
    min_distance_mm: f64,
    /// Far edge of the band (millimeters, inclusive)
    max_distance_mm: f64,
    /// Fraction of region pixels (0-1) the band coverage must exceed
    coverage_threshold: f64,
}

impl DangerZoneConfig {
    /// Build a validated config from millimeter bounds
    pub fn new(
        min_distance_mm: f64,
        max_distance_mm: f64,
        coverage_threshold: f64,
    ) -> Result<Self, DetectionError> {
        if !min_distance_mm.is_finite()
            || !max_distance_mm.is_finite()
            || min_distance_mm < 0.0
            || min_distance_mm >= max_distance_mm
        {
            return Err(DetectionError::InvalidBand {
                min_mm: min_distance_mm,
                max_mm: max_distance_mm,
            });
        }

        if !(0.0..=1.0).contains(&coverage_threshold) {
            return Err(DetectionError::InvalidCoverageThreshold(coverage_threshold));
        }

        Ok(Self {
            min_distance_mm,
            max_distance_mm,
            coverage_threshold,
        })
    }

    /// Build a validated config from bounds in feet
    pub fn from_feet(
        min_distance_feet: f64,
        max_distance_feet: f64,
        coverage_threshold: f64,
    ) -> Result<Self, DetectionError> {
        Self::new(
            feet_to_mm(min_distance_feet),
            feet_to_mm(max_distance_feet),
            coverage_threshold,
        )
    }

    pub fn min_distance_mm(&self) -> f64 {
        self.min_distance_mm
    }

    pub fn max_distance_mm(&self) -> f64 {
        self.max_distance_mm
    }

    pub fn coverage_threshold(&self) -> f64 {
        self.coverage_threshold
    }

    /// Whether a single depth reading lies inside the band
    pub fn contains(&self, distance_mm: u16) -> bool {
        let d = f64::from(distance_mm);
        d >= self.min_distance_mm && d <= self.max_distance_mm
    }
}

impl Default for DangerZoneConfig {
    /// 2 to 6 feet, 10% coverage
    fn default() -> Self {
        Self {
            min_distance_mm: feet_to_mm(2.0),
            max_distance_mm: feet_to_mm(6.0),
            coverage_threshold: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_feet() {
        let config = DangerZoneConfig::from_feet(2.0, 4.0, 0.1).unwrap();
        assert!((config.min_distance_mm() - 609.6).abs() < 1e-9);
        assert!((config.max_distance_mm() - 1219.2).abs() < 1e-9);
        assert_eq!(config.coverage_threshold(), 0.1);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let config = DangerZoneConfig::new(600.0, 1200.0, 0.1).unwrap();
        assert!(!config.contains(599));
        assert!(config.contains(600));
        assert!(config.contains(1200));
        assert!(!config.contains(1201));
    }

    #[test]
    fn test_rejects_inverted_band() {
        assert!(matches!(
            DangerZoneConfig::from_feet(4.0, 2.0, 0.1),
            Err(DetectionError::InvalidBand { .. })
        ));
        assert!(matches!(
            DangerZoneConfig::new(1000.0, 1000.0, 0.1),
            Err(DetectionError::InvalidBand { .. })
        ));
        assert!(matches!(
            DangerZoneConfig::new(-1.0, 1000.0, 0.1),
            Err(DetectionError::InvalidBand { .. })
        ));
        assert!(matches!(
            DangerZoneConfig::new(0.0, f64::NAN, 0.1),
            Err(DetectionError::InvalidBand { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        assert_eq!(
            DangerZoneConfig::new(0.0, 1000.0, 1.5),
            Err(DetectionError::InvalidCoverageThreshold(1.5))
        );
        assert!(DangerZoneConfig::new(0.0, 1000.0, f64::NAN).is_err());
        assert!(DangerZoneConfig::new(0.0, 1000.0, 0.0).is_ok());
        assert!(DangerZoneConfig::new(0.0, 1000.0, 1.0).is_ok());
    }

    #[test]
    fn test_default_matches_from_feet() {
        assert_eq!(
            DangerZoneConfig::default(),
            DangerZoneConfig::from_feet(2.0, 6.0, 0.1).unwrap()
        );
    }
}
