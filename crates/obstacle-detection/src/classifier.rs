//! Danger-zone coverage of a single region

use ndarray::ArrayView2;

use crate::DangerZoneConfig;

/// Unrounded coverage result for an obstructed region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneReading {
    /// Fraction of region pixels inside the band (0-1)
    pub coverage: f64,
    /// Mean distance of the in-band pixels (millimeters)
    pub mean_distance_mm: f64,
}

/// Measures how much of a region lies inside the danger zone
#[derive(Debug, Clone)]
pub struct DangerZoneClassifier {
    config: DangerZoneConfig,
}

impl DangerZoneClassifier {
    pub fn new(config: DangerZoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DangerZoneConfig {
        &self.config
    }

    /// Classify a region's depth values.
    ///
    /// Returns `None` unless the in-band coverage strictly exceeds the
    /// configured threshold. Empty regions are never obstructed.
    pub fn classify(&self, region: ArrayView2<'_, u16>) -> Option<ZoneReading> {
        let total = region.len();
        if total == 0 {
            return None;
        }

        let (in_band, sum_mm) = region
            .iter()
            .filter(|&&mm| self.config.contains(mm))
            .fold((0usize, 0.0f64), |(count, sum), &mm| {
                (count + 1, sum + f64::from(mm))
            });

        let coverage = in_band as f64 / total as f64;
        if in_band == 0 || coverage <= self.config.coverage_threshold() {
            return None;
        }

        Some(ZoneReading {
            coverage,
            mean_distance_mm: sum_mm / in_band as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn classifier() -> DangerZoneClassifier {
        DangerZoneClassifier::new(DangerZoneConfig::new(600.0, 1200.0, 0.1).unwrap())
    }

    #[test]
    fn test_empty_region_is_clear() {
        let empty: Array2<u16> = Array2::zeros((4, 0));
        assert_eq!(classifier().classify(empty.view()), None);
    }

    #[test]
    fn test_fully_covered_region() {
        let region = Array2::from_elem((10, 10), 900u16);
        let reading = classifier().classify(region.view()).unwrap();
        assert_eq!(reading.coverage, 1.0);
        assert_eq!(reading.mean_distance_mm, 900.0);
    }

    #[test]
    fn test_mean_ignores_out_of_band_pixels() {
        let region = array![[700u16, 5000], [900, 100]];
        let reading = classifier().classify(region.view()).unwrap();
        assert_eq!(reading.coverage, 0.5);
        assert_eq!(reading.mean_distance_mm, 800.0);
    }

    #[test]
    fn test_threshold_must_be_exceeded() {
        // exactly 10% in band
        let mut region = Array2::from_elem((1, 10), 3000u16);
        region[[0, 0]] = 800;
        assert_eq!(classifier().classify(region.view()), None);

        // 20% in band
        region[[0, 1]] = 800;
        assert!(classifier().classify(region.view()).is_some());
    }

    #[test]
    fn test_zero_threshold_still_needs_a_pixel() {
        let classifier =
            DangerZoneClassifier::new(DangerZoneConfig::new(600.0, 1200.0, 0.0).unwrap());
        let region = Array2::from_elem((3, 3), 0u16);
        assert_eq!(classifier.classify(region.view()), None);
    }
}
