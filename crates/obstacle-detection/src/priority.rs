//! Priority obstacle selection

use crate::ObstacleObservation;

/// Picks the obstacle to announce
#[derive(Debug, Clone, Copy, Default)]
pub struct PrioritySelector;

impl PrioritySelector {
    pub fn new() -> Self {
        Self
    }

    /// Closest obstacle; equal distances resolve left before center before right
    pub fn select(&self, observations: &[ObstacleObservation]) -> Option<ObstacleObservation> {
        observations
            .iter()
            .min_by(|a, b| {
                a.distance_feet
                    .total_cmp(&b.distance_feet)
                    .then_with(|| a.region.cmp(&b.region))
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Region;
    use chrono::Utc;

    fn obs(region: Region, distance_feet: f64) -> ObstacleObservation {
        ObstacleObservation {
            region,
            distance_feet,
            distance_mm: (distance_feet * 304.8) as u32,
            coverage_percent: 25.0,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_selects_nothing() {
        assert_eq!(PrioritySelector::new().select(&[]), None);
    }

    #[test]
    fn test_selects_closest() {
        let obstacles = vec![
            obs(Region::Left, 3.5),
            obs(Region::Center, 2.1),
            obs(Region::Right, 3.8),
        ];

        let priority = PrioritySelector::new().select(&obstacles).unwrap();
        assert_eq!(priority.region, Region::Center);
        assert_eq!(priority.distance_feet, 2.1);
    }

    #[test]
    fn test_ties_follow_region_order() {
        let obstacles = vec![
            obs(Region::Right, 2.4),
            obs(Region::Center, 2.4),
            obs(Region::Left, 3.0),
        ];
        let priority = PrioritySelector::new().select(&obstacles).unwrap();
        assert_eq!(priority.region, Region::Center);

        let obstacles = vec![obs(Region::Right, 2.4), obs(Region::Left, 2.4)];
        let priority = PrioritySelector::new().select(&obstacles).unwrap();
        assert_eq!(priority.region, Region::Left);
    }
}
