//! Arc-family layout: pie, donut and gauge angles.

use std::f64::consts::PI;

use crate::data::{ShapeKind, Target, TargetStore};

/// Angular geometry for one arc target, in radians. Angle zero points up
/// and angles grow clockwise, matching the usual pie convention.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcGeometry {
    pub id: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// 0 for pie, > 0 for donut/gauge.
    pub inner_radius_ratio: f64,
}

/// Donut hole ratio.
const DONUT_INNER_RATIO: f64 = 0.6;
/// Gauge band ratio.
const GAUGE_INNER_RATIO: f64 = 0.7;

/// Lays out pie/donut sectors for the visible arc targets, proportional to
/// each target's value sum. Targets without a positive sum get a
/// zero-sweep sector so the data-join stays index-stable.
#[must_use]
pub fn arc_layout(store: &TargetStore) -> Vec<ArcGeometry> {
    let sums: Vec<(String, ShapeKind, f64)> = store
        .visible()
        .filter(|target| target.kind.is_arc() && target.kind != ShapeKind::Gauge)
        .map(|target| {
            let sum: f64 = target
                .values
                .iter()
                .filter_map(|value| value.value)
                .filter(|v| *v > 0.0)
                .sum();
            (target.id.clone(), target.kind, sum)
        })
        .collect();

    let total: f64 = sums.iter().map(|(_, _, sum)| *sum).sum();
    let mut angle = 0.0;
    sums.into_iter()
        .map(|(id, kind, sum)| {
            let sweep = if total > 0.0 {
                (sum / total) * 2.0 * PI
            } else {
                0.0
            };
            let geometry = ArcGeometry {
                id,
                start_angle: angle,
                end_angle: angle + sweep,
                inner_radius_ratio: if kind == ShapeKind::Donut {
                    DONUT_INNER_RATIO
                } else {
                    0.0
                },
            };
            angle += sweep;
            geometry
        })
        .collect()
}

/// Maps a gauge target's latest value over `[min, max]` to a half-circle
/// sweep from -90 to +90 degrees.
#[must_use]
pub fn gauge_layout(target: &Target, min: f64, max: f64) -> ArcGeometry {
    let value = target
        .values
        .iter()
        .rev()
        .find_map(|value| value.value)
        .unwrap_or(min);
    let span = max - min;
    let ratio = if span.abs() > f64::EPSILON {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ArcGeometry {
        id: target.id.clone(),
        start_angle: -PI / 2.0,
        end_angle: -PI / 2.0 + ratio * PI,
        inner_radius_ratio: GAUGE_INNER_RATIO,
    }
}
