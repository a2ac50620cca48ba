//! Fixed left/center/right frame regions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Number of regions a frame is split into
pub const REGION_COUNT: usize = 3;

/// Frame region, ordered left to right.
///
/// The derived ordering is the tie-break rank used when two obstacles are
/// equally close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Left,
    Center,
    Right,
}

impl Region {
    /// All regions in left-to-right order
    pub const ALL: [Region; REGION_COUNT] = [Region::Left, Region::Center, Region::Right];

    /// Lowercase name used in spoken messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Left => "left",
            Region::Center => "center",
            Region::Right => "right",
        }
    }

    /// Position in left-to-right order
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A region and the frame columns it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpan {
    pub region: Region,
    pub columns: Range<usize>,
}

/// Splits frame columns into the fixed regions
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionSegmenter;

impl RegionSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Partition `[0, width)` into one column range per region.
    ///
    /// Each range is `width / 3` columns wide; the last one also takes the
    /// remainder. With fewer than three columns the leading ranges are empty.
    pub fn partition(&self, width: usize) -> [RegionSpan; REGION_COUNT] {
        let step = width / REGION_COUNT;

        Region::ALL.map(|region| {
            let lo = region.rank() * step;
            let hi = if region.rank() == REGION_COUNT - 1 {
                width
            } else {
                lo + step
            };
            RegionSpan {
                region,
                columns: lo..hi,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        let spans = RegionSegmenter::new().partition(9);
        assert_eq!(spans[0].columns, 0..3);
        assert_eq!(spans[1].columns, 3..6);
        assert_eq!(spans[2].columns, 6..9);
    }

    #[test]
    fn test_remainder_goes_to_last_region() {
        let spans = RegionSegmenter::new().partition(640);
        assert_eq!(spans[0].columns, 0..213);
        assert_eq!(spans[1].columns, 213..426);
        assert_eq!(spans[2].columns, 426..640);

        let spans = RegionSegmenter::new().partition(5);
        assert_eq!(spans[0].columns, 0..1);
        assert_eq!(spans[1].columns, 1..2);
        assert_eq!(spans[2].columns, 2..5);
    }

    #[test]
    fn test_narrow_frame_leaves_empty_regions() {
        let spans = RegionSegmenter::new().partition(2);
        assert!(spans[0].columns.is_empty());
        assert!(spans[1].columns.is_empty());
        assert_eq!(spans[2].columns, 0..2);
    }

    #[test]
    fn test_region_order_and_names() {
        let spans = RegionSegmenter::new().partition(30);
        let regions: Vec<_> = spans.iter().map(|s| s.region).collect();
        assert_eq!(regions, Region::ALL.to_vec());

        assert!(Region::Left < Region::Center && Region::Center < Region::Right);
        assert_eq!(Region::Center.to_string(), "center");
        assert_eq!(Region::Right.rank(), 2);
    }

    proptest! {
        #[test]
        fn partition_is_disjoint_and_complete(width in 0usize..5000) {
            let spans = RegionSegmenter::new().partition(width);

            prop_assert_eq!(spans[0].columns.start, 0);
            prop_assert_eq!(spans[REGION_COUNT - 1].columns.end, width);
            for pair in spans.windows(2) {
                prop_assert_eq!(pair[0].columns.end, pair[1].columns.start);
            }

            let covered: usize = spans.iter().map(|s| s.columns.len()).sum();
            prop_assert_eq!(covered, width);
        }
    }
}
