//! Area geometry: an upper anchor path plus its baseline path.

use crate::data::{Target, TargetStore};
use crate::shape::{Point, ShapeScales, stack::stack_base};

/// Upper and lower edges of one area target, index-aligned with its values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaBand {
    pub upper: Vec<Option<Point>>,
    pub lower: Vec<Option<Point>>,
}

/// Generates the band for one area target. The lower edge follows the stack
/// base (zero for ungrouped targets); gaps break both edges.
#[must_use]
pub fn area_band(
    target: &Target,
    store: &TargetStore,
    groups: &[Vec<String>],
    scales: ShapeScales,
) -> AreaBand {
    let mut band = AreaBand {
        upper: Vec::with_capacity(target.values.len()),
        lower: Vec::with_capacity(target.values.len()),
    };
    for value in &target.values {
        let (Some(v), true) = (value.value, value.has_position()) else {
            band.upper.push(None);
            band.lower.push(None);
            continue;
        };
        let base = stack_base(store, groups, target, value);
        band.upper.push(Some(scales.project(value.x, base + v)));
        band.lower.push(Some(scales.project(value.x, base)));
    }
    band
}
