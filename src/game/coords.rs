//! Pointer position ↔ board coordinate mapping.

use serde::{Deserialize, Serialize};

/// Distance between grid lines on the reference canvas, in pixels.
pub const GRID_SIZE: f64 = 30.0;

/// Linear mapping between pointer space and grid intersections.
///
/// Intersection `(row, col)` sits at
/// `(origin_x + col * spacing_x, origin_y + row * spacing_y)`. A pointer maps
/// to the nearest intersection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    origin_x: f64,
    origin_y: f64,
    spacing_x: f64,
    spacing_y: f64,
}

impl CoordinateMapper {
    /// Creates a mapper with the given origin and spacing.
    pub fn new(origin_x: f64, origin_y: f64, spacing_x: f64, spacing_y: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            spacing_x,
            spacing_y,
        }
    }

    /// The reference canvas layout: first line at 30px, lines 30px apart.
    pub fn canvas() -> Self {
        Self::new(GRID_SIZE, GRID_SIZE, GRID_SIZE, GRID_SIZE)
    }

    /// Nearest intersection to `(x, y)`, or `None` when it falls off a board
    /// of `size` lines.
    pub fn to_cell(&self, x: f64, y: f64, size: usize) -> Option<(usize, usize)> {
        let row = ((y - self.origin_y) / self.spacing_y).round();
        let col = ((x - self.origin_x) / self.spacing_x).round();
        let limit = size as f64;
        if !(0.0..limit).contains(&row) || !(0.0..limit).contains(&col) {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// Pointer position of intersection `(row, col)`.
    pub fn to_pixel(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.spacing_x,
            self.origin_y + row as f64 * self.spacing_y,
        )
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::canvas()
    }
}
