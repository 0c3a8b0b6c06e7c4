//! Shape geometry generators.
//!
//! Pure functions of `(target, scales, offsets)`; scales are immutable value
//! objects passed explicitly per call, never captured by closures. An
//! axis-rotation flag swaps the X/Y role of every formula.

pub mod arc;
pub mod area;
pub mod bar;
pub mod line;
pub mod stack;

pub use arc::{ArcGeometry, arc_layout, gauge_layout};
pub use area::{AreaBand, area_band};
pub use bar::{BarRect, BarSlot, bar_rects};
pub use line::{line_points, region_segments, step_points};
pub use stack::stack_base;

use crate::scale::{LinearScale, XScale};

/// Device-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Scale pair plus the axis-rotation flag, rebuilt every redraw.
#[derive(Debug, Clone, Copy)]
pub struct ShapeScales {
    pub x: XScale,
    pub y: LinearScale,
    /// Swap the X/Y role of every coordinate formula.
    pub rotated: bool,
}

impl ShapeScales {
    /// Maps one (x, y-domain) pair to a device point, honoring rotation.
    #[must_use]
    pub fn project(self, x: f64, y: f64) -> Point {
        let x_px = self.x.scale_datum(x);
        let y_px = self.y.scale(y);
        if self.rotated {
            Point::new(y_px, x_px)
        } else {
            Point::new(x_px, y_px)
        }
    }
}
