//! Line-family geometry: anchors, step expansion, region micro-segments.

use smallvec::SmallVec;

use crate::data::{Target, Value};
use crate::shape::{Point, ShapeScales};

/// Per-value anchor for a line path.
///
/// The anchor is duplicated so every shape family exposes a uniform indexed
/// point table (bars fill four corners; lines repeat the same anchor).
pub type LineAnchor = SmallVec<[Point; 2]>;

/// Projects a line-family target into per-index anchors. `None` marks an
/// explicit gap that breaks the path.
#[must_use]
pub fn line_points(target: &Target, scales: ShapeScales) -> Vec<Option<LineAnchor>> {
    project_values(&target.values, scales)
}

/// Projects an explicit value sequence (used after step expansion).
#[must_use]
pub fn project_values(values: &[Value], scales: ShapeScales) -> Vec<Option<LineAnchor>> {
    values
        .iter()
        .map(|value| {
            let (Some(v), true) = (value.value, value.has_position()) else {
                return None;
            };
            let anchor = scales.project(value.x, v);
            Some(SmallVec::from_buf([anchor, anchor]))
        })
        .collect()
}

/// Expands a value sequence into a stair-step sequence, duplicating each
/// point at the transition boundary (step-after interpolation).
#[must_use]
pub fn step_points(values: &[Value]) -> Vec<Value> {
    let mut expanded = Vec::with_capacity(values.len().saturating_mul(2));
    for pair in values.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        expanded.push(current);
        if current.value.is_some() && next.value.is_some() {
            expanded.push(Value::new(next.x, current.value, current.index));
        }
    }
    if let Some(last) = values.last() {
        expanded.push(*last);
    }
    expanded
}

/// One micro-segment of a subdivided line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// Midpoint falls inside a configured region.
    pub in_region: bool,
}

/// Default micro-segment length in pixels.
pub const MICRO_SEGMENT_PX: f64 = 2.0;

/// Subdivides the segment `from -> to` into fixed-length micro-segments when
/// it crosses any of the region x-ranges (device pixels), so the in-region
/// sub-path can be styled independently. A segment touching no region is
/// returned whole.
#[must_use]
pub fn region_segments(
    from: Point,
    to: Point,
    regions_px: &[(f64, f64)],
    micro_len_px: f64,
) -> Vec<Segment> {
    let crosses = regions_px.iter().any(|&(start, end)| {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        from.x.max(to.x) >= lo && from.x.min(to.x) <= hi
    });
    if !crosses {
        return vec![Segment {
            from,
            to,
            in_region: false,
        }];
    }

    let length = from.distance_to(to);
    let micro = micro_len_px.max(0.25);
    let steps = ((length / micro).ceil() as usize).max(1);
    let mut segments = Vec::with_capacity(steps);
    for step in 0..steps {
        let t0 = step as f64 / steps as f64;
        let t1 = (step + 1) as f64 / steps as f64;
        let a = lerp(from, to, t0);
        let b = lerp(from, to, t1);
        let mid_x = (a.x + b.x) / 2.0;
        let in_region = regions_px.iter().any(|&(start, end)| {
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            mid_x >= lo && mid_x <= hi
        });
        segments.push(Segment {
            from: a,
            to: b,
            in_region,
        });
    }
    segments
}

fn lerp(from: Point, to: Point, t: f64) -> Point {
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}
