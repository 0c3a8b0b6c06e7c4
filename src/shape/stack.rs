//! Baseline offsets for stacked series.

use crate::data::{Target, TargetStore, Value};

/// Domain-unit baseline for one value of a stacked target.
///
/// Walks the targets preceding `target` in its group's order; a predecessor
/// contributes when its x aligns (exact match, else the nearest-index
/// fallback for heterogeneous x sets) and its value has the same sign as the
/// current value. Ungrouped targets and gaps have a zero base.
#[must_use]
pub fn stack_base(
    store: &TargetStore,
    groups: &[Vec<String>],
    target: &Target,
    value: &Value,
) -> f64 {
    let Some(current) = value.value else {
        return 0.0;
    };
    let Some(group) = groups.iter().find(|group| group.contains(&target.id)) else {
        return 0.0;
    };

    let mut base = 0.0;
    for other_id in group {
        if *other_id == target.id {
            break;
        }
        let Some(other) = store.get(other_id) else {
            continue;
        };
        if other.hidden || other.axis != target.axis {
            continue;
        }
        if let Some(aligned) = other.value_on_x(value.x, value.index)
            && let Some(other_value) = aligned.value
            && (other_value >= 0.0) == (current >= 0.0)
        {
            base += other_value;
        }
    }
    base
}
