//! Depth frame types

use chrono::{DateTime, Utc};
use ndarray::{s, Array2, ArrayView2};
use std::ops::Range;

use crate::CaptureError;

/// Millimeters in one foot
pub const MM_PER_FOOT: f64 = 304.8;

/// Convert millimeters to feet
pub fn mm_to_feet(mm: f64) -> f64 {
    mm / MM_PER_FOOT
}

/// Convert feet to millimeters
pub fn feet_to_mm(feet: f64) -> f64 {
    feet * MM_PER_FOOT
}

/// A single depth frame.
///
/// The grid is indexed `[row, column]`, i.e. `[y, x]`, and every value is a
/// distance in millimeters. A value of 0 means the sensor had no reading for
/// that pixel.
#[derive(Debug, Clone)]
pub struct DepthFrame {
    depth: Array2<u16>,
    captured_at: DateTime<Utc>,
    sequence: u64,
}

impl DepthFrame {
    /// Create a frame from a depth grid of shape `(height, width)`
    pub fn new(depth: Array2<u16>, captured_at: DateTime<Utc>, sequence: u64) -> Self {
        Self {
            depth,
            captured_at,
            sequence,
        }
    }

    /// Create a frame from a row-major buffer
    pub fn from_raw(
        width: u32,
        height: u32,
        data: Vec<u16>,
        captured_at: DateTime<Utc>,
        sequence: u64,
    ) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(CaptureError::Format(format!(
                "expected {}x{} = {} depth values, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }

        let depth = Array2::from_shape_vec((height as usize, width as usize), data)
            .map_err(|e| CaptureError::Format(e.to_string()))?;

        Ok(Self::new(depth, captured_at, sequence))
    }

    /// Frame filled with a single distance
    pub fn filled(width: u32, height: u32, distance_mm: u16, captured_at: DateTime<Utc>) -> Self {
        Self::new(
            Array2::from_elem((height as usize, width as usize), distance_mm),
            captured_at,
            0,
        )
    }

    /// Frame width (columns)
    pub fn width(&self) -> usize {
        self.depth.ncols()
    }

    /// Frame height (rows)
    pub fn height(&self) -> usize {
        self.depth.nrows()
    }

    /// Full depth grid
    pub fn depth(&self) -> ArrayView2<'_, u16> {
        self.depth.view()
    }

    /// All rows of a contiguous range of columns
    pub fn columns(&self, columns: Range<usize>) -> ArrayView2<'_, u16> {
        let end = columns.end.min(self.width());
        let start = columns.start.min(end);
        self.depth.slice(s![.., start..end])
    }

    /// Depth at pixel (x, y) in millimeters
    pub fn depth_at(&self, x: usize, y: usize) -> Option<u16> {
        self.depth.get((y, x)).copied()
    }

    /// Capture timestamp
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Frame sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
