//! Pointer interaction: event-rect layout and hit-testing.
//!
//! Hit-testing runs against the geometry of the most recent redraw, so the
//! pointer and the drawn shapes always agree on scales.

pub mod zoom;

pub use zoom::{clamp_zoom_window, zoom_ratio};

use crate::data::{AxisBinding, TargetStore};
use crate::shape::{BarRect, Point, ShapeScales};

/// How pointer events are captured over the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRectMode {
    /// One rect per shared x position, spanning to the midpoints of the
    /// neighboring positions.
    SingleX,
    /// One plot-sized rect; the hovered index is resolved per target by
    /// nearest-point search.
    MultipleX,
}

/// Picks the capture mode for the current target set.
#[must_use]
pub fn event_rect_mode(store: &TargetStore) -> EventRectMode {
    if store.shares_single_x() {
        EventRectMode::SingleX
    } else {
        EventRectMode::MultipleX
    }
}

/// One pointer capture rectangle in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRect {
    /// Data index this rect resolves to; `usize::MAX` for the plot-sized
    /// multiple-x rect.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl EventRect {
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Lays out per-index capture rects for the single-x mode.
///
/// Each rect spans from the midpoint before its x position to the midpoint
/// after it; the first and last rects extend to the plot edges. With axis
/// rotation the rects span horizontally instead.
#[must_use]
pub fn single_x_rects(
    store: &TargetStore,
    scales: ShapeScales,
    plot_width: f64,
    plot_height: f64,
) -> Vec<EventRect> {
    let Some(longest) = store
        .visible()
        .max_by_key(|target| target.values.len())
    else {
        return Vec::new();
    };

    let positions: Vec<(usize, f64)> = longest
        .values
        .iter()
        .filter(|value| value.has_position())
        .map(|value| (value.index, scales.x.scale_datum(value.x)))
        .collect();
    if positions.is_empty() {
        return Vec::new();
    }

    let across = if scales.rotated { plot_height } else { plot_width };
    let mut rects = Vec::with_capacity(positions.len());
    for (slot, &(index, center)) in positions.iter().enumerate() {
        let start = if slot == 0 {
            0.0
        } else {
            (positions[slot - 1].1 + center) / 2.0
        };
        let end = if slot + 1 == positions.len() {
            across
        } else {
            (center + positions[slot + 1].1) / 2.0
        };
        let rect = if scales.rotated {
            EventRect {
                index,
                x: 0.0,
                y: start,
                width: plot_width,
                height: end - start,
            }
        } else {
            EventRect {
                index,
                x: start,
                y: 0.0,
                width: end - start,
                height: plot_height,
            }
        };
        rects.push(rect);
    }
    rects
}

/// The plot-sized capture rect for the multiple-x mode.
#[must_use]
pub fn multiple_x_rect(plot_width: f64, plot_height: f64) -> EventRect {
    EventRect {
        index: usize::MAX,
        x: 0.0,
        y: 0.0,
        width: plot_width,
        height: plot_height,
    }
}

/// One resolved hover/click hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub target_id: String,
    pub index: usize,
    /// Pointer distance to the shape's anchor point, in pixels.
    pub distance: f64,
}

/// Resolves the pointer against the drawn shapes.
///
/// Point-anchored shapes hit when the pointer falls within `sensitivity`
/// pixels of the projected value. Bars hit while the pointer is anywhere
/// inside the rectangle. Every candidate is collected and the one whose
/// anchor (bar center, point position) is closest to the pointer wins.
#[must_use]
pub fn hit_test(
    store: &TargetStore,
    y_scales: ShapeScales,
    y2_scales: ShapeScales,
    bars: &[(String, Vec<BarRect>)],
    pointer: Point,
    sensitivity: f64,
) -> Option<Hit> {
    let mut best: Option<Hit> = None;

    for (id, rects) in bars {
        for rect in rects {
            if !rect.contains(pointer) {
                continue;
            }
            consider(
                &mut best,
                Hit {
                    target_id: id.clone(),
                    index: rect.index,
                    distance: pointer.distance_to(rect.center()),
                },
            );
        }
    }

    for target in store.visible() {
        if target.kind.is_bar() || target.kind.is_arc() {
            continue;
        }
        // Project through the axis the target is drawn against.
        let scales = match target.axis {
            AxisBinding::Y => y_scales,
            AxisBinding::Y2 => y2_scales,
        };
        for value in &target.values {
            let (Some(v), true) = (value.value, value.has_position()) else {
                continue;
            };
            let anchor = scales.project(value.x, v);
            let distance = pointer.distance_to(anchor);
            if distance > sensitivity {
                continue;
            }
            consider(
                &mut best,
                Hit {
                    target_id: target.id.clone(),
                    index: value.index,
                    distance,
                },
            );
        }
    }

    best
}

fn consider(best: &mut Option<Hit>, candidate: Hit) {
    let closer = best
        .as_ref()
        .is_none_or(|current| candidate.distance < current.distance);
    if closer {
        *best = Some(candidate);
    }
}
