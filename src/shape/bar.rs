//! Bar geometry: each value becomes four polygon corners.

use smallvec::SmallVec;

use crate::data::{Target, TargetStore};
use crate::shape::{Point, ShapeScales, stack::stack_base};

/// Horizontal placement of one target's bars inside a tick interval.
///
/// Side-by-side bar targets divide the interval; stacked targets share the
/// slot of their group's base target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSlot {
    /// Width of one bar in pixels.
    pub width: f64,
    /// Offset of this target's bar from the tick anchor, in pixels.
    pub offset: f64,
}

impl BarSlot {
    /// Splits a tick interval among `lanes` bar lanes using the given
    /// occupancy ratio, returning the slot for `lane`.
    #[must_use]
    pub fn for_lane(tick_interval_px: f64, ratio: f64, lanes: usize, lane: usize) -> Self {
        let lanes = lanes.max(1);
        let occupied = (tick_interval_px * ratio).max(0.0);
        let width = occupied / lanes as f64;
        let offset = -occupied / 2.0 + width * lane as f64;
        Self { width, offset }
    }
}

/// Four-corner rectangle for one bar value, in device coordinates.
///
/// Corner order: base edge first, then the value edge, so attribute
/// transitions grow bars out of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub index: usize,
    pub corners: SmallVec<[Point; 4]>,
}

impl BarRect {
    /// Axis-aligned containment check used by hit-testing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for corner in &self.corners {
            min_x = min_x.min(corner.x);
            max_x = max_x.max(corner.x);
            min_y = min_y.min(corner.y);
            max_y = max_y.max(corner.y);
        }
        point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
    }

    /// Geometric center, used for distance tie-breaks in hit-testing.
    #[must_use]
    pub fn center(&self) -> Point {
        let count = self.corners.len().max(1) as f64;
        let sum = self
            .corners
            .iter()
            .fold(Point::default(), |acc, corner| {
                Point::new(acc.x + corner.x, acc.y + corner.y)
            });
        Point::new(sum.x / count, sum.y / count)
    }
}

/// Generates bar rectangles for one target. Gaps produce no rectangle.
#[must_use]
pub fn bar_rects(
    target: &Target,
    store: &TargetStore,
    groups: &[Vec<String>],
    scales: ShapeScales,
    slot: BarSlot,
) -> Vec<BarRect> {
    let mut rects = Vec::with_capacity(target.values.len());
    for value in &target.values {
        let (Some(v), true) = (value.value, value.has_position()) else {
            continue;
        };
        let base = stack_base(store, groups, target, value);

        let anchor = scales.x.scale_datum(value.x) + slot.offset;
        let base_px = scales.y.scale(base);
        let value_px = scales.y.scale(base + v);

        let corners: SmallVec<[Point; 4]> = if scales.rotated {
            SmallVec::from_buf([
                Point::new(base_px, anchor),
                Point::new(base_px, anchor + slot.width),
                Point::new(value_px, anchor + slot.width),
                Point::new(value_px, anchor),
            ])
        } else {
            SmallVec::from_buf([
                Point::new(anchor, base_px),
                Point::new(anchor + slot.width, base_px),
                Point::new(anchor + slot.width, value_px),
                Point::new(anchor, value_px),
            ])
        };

        rects.push(BarRect {
            index: value.index,
            corners,
        });
    }
    rects
}
