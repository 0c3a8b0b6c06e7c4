//! Domain computation for the X and Y axes, including stacked-series
//! aggregation, zero-basing, padding, and single-point synthesis.
//!
//! Both entry points are pure functions of the target store and the config:
//! calling them twice with identical inputs yields identical output. All
//! arithmetic is guarded so an empty or degenerate target set can never
//! produce a NaN domain.

use crate::config::{AxisBound, ChartConfig, PaddingValue, XAxisKind};
use crate::data::ingest::parse_time_str;
use crate::data::{AxisBinding, Target, TargetStore};

/// Vertical room reserved for on-chart data labels, converted into domain
/// units via `px * span / axis_len`.
const DATA_LABEL_EXTENT_PX: f64 = 15.0;

/// Fallback distance when a single explicit bound would invert the domain.
const ONE_SIDED_BOUND_MARGIN: f64 = 10.0;

/// Stack groups resolved against the store: only stackable, known ids are
/// kept and a target contributes to at most one group (first group wins).
#[must_use]
pub fn resolve_stack_groups(groups: &[Vec<String>], store: &TargetStore) -> Vec<Vec<String>> {
    let mut seen: Vec<&str> = Vec::new();
    let mut resolved = Vec::new();
    for group in groups {
        let mut members = Vec::new();
        for id in group {
            if seen.iter().any(|known| known == id) {
                continue;
            }
            let Some(target) = store.get(id) else {
                continue;
            };
            if !target.kind.is_stackable() {
                continue;
            }
            seen.push(id.as_str());
            members.push(id.clone());
        }
        if members.len() > 1 {
            resolved.push(members);
        }
    }
    resolved
}

/// Per-index positive and negative running sums for one stack group.
///
/// Positive and negative values accumulate separately so one group can show
/// bars both above and below a zero baseline. Gaps (`None`) do not stack.
#[derive(Debug, Clone, Default)]
pub struct GroupSums {
    pub positive: Vec<f64>,
    pub negative: Vec<f64>,
}

#[must_use]
pub fn group_sums(group: &[String], store: &TargetStore, axis: AxisBinding) -> GroupSums {
    let mut sums = GroupSums::default();
    for id in group {
        let Some(target) = store.get(id) else {
            continue;
        };
        if target.hidden || target.axis != axis {
            continue;
        }
        for value in &target.values {
            let Some(v) = value.value else { continue };
            if value.index >= sums.positive.len() {
                sums.positive.resize(value.index + 1, 0.0);
                sums.negative.resize(value.index + 1, 0.0);
            }
            if v >= 0.0 {
                sums.positive[value.index] += v;
            } else {
                sums.negative[value.index] += v;
            }
        }
    }
    sums
}

/// Computes the live Y domain for one axis.
#[must_use]
pub fn y_domain(
    store: &TargetStore,
    config: &ChartConfig,
    axis: AxisBinding,
    axis_len_px: f64,
) -> [f64; 2] {
    let axis_cfg = match axis {
        AxisBinding::Y => &config.axis.y,
        AxisBinding::Y2 => &config.axis.y2,
    };

    let targets: Vec<&Target> = store.visible_on(axis).collect();
    if targets.is_empty() {
        return axis_cfg.default_domain.unwrap_or([0.0, 1.0]);
    }

    let (computed_min, computed_max) = match value_extent(&targets, store, config, axis) {
        Some(extent) => extent,
        None => return axis_cfg.default_domain.unwrap_or([0.0, 1.0]),
    };

    let mut y_min = axis_cfg.min.unwrap_or(computed_min);
    let mut y_max = axis_cfg.max.unwrap_or(computed_max);

    // One explicit bound crossing the computed other bound synthesizes the
    // missing bound instead of inverting the domain.
    if axis_cfg.min.is_some() && axis_cfg.max.is_none() && y_min >= y_max {
        y_max = y_min + ONE_SIDED_BOUND_MARGIN;
    }
    if axis_cfg.max.is_some() && axis_cfg.min.is_none() && y_max <= y_min {
        y_min = y_max - ONE_SIDED_BOUND_MARGIN;
    }

    // A flat domain expands to straddle zero with one bound exactly zero.
    if y_min == y_max {
        if y_min < 0.0 {
            y_max = 0.0;
        } else if y_min > 0.0 {
            y_min = 0.0;
        } else {
            y_max = 1.0;
        }
    }

    let zero_based = axis_cfg
        .zero_based
        .unwrap_or_else(|| targets.iter().any(|t| t.kind.zero_based_by_default()));
    let all_positive = y_min >= 0.0 && y_max >= 0.0;
    let all_negative = y_min <= 0.0 && y_max <= 0.0;

    if zero_based {
        if all_positive {
            y_min = 0.0;
        }
        if all_negative {
            y_max = 0.0;
        }
    }

    // Re-center symmetrically using the larger absolute half-span.
    if let Some(center) = axis_cfg.center {
        let half = (y_max - center).abs().max((y_min - center).abs());
        y_max = center + half;
        y_min = center - half;
    }

    let span = y_max - y_min;
    let mut padding_top = span * 0.1;
    let mut padding_bottom = span * 0.1;

    if config.data.labels.show {
        let extent = px_to_domain(DATA_LABEL_EXTENT_PX, span, axis_len_px);
        padding_top += extent;
        if computed_min < 0.0 {
            padding_bottom += extent;
        }
    }

    if let Some(padding) = axis_cfg.padding_top {
        padding_top = resolve_padding(padding, span, axis_len_px);
    }
    if let Some(padding) = axis_cfg.padding_bottom {
        padding_bottom = resolve_padding(padding, span, axis_len_px);
    }

    let mut lower = y_min - padding_bottom;
    let mut upper = y_max + padding_top;

    // Padding never pushes a zero-based bound across zero.
    if zero_based {
        if all_positive {
            lower = 0.0;
        }
        if all_negative {
            upper = 0.0;
        }
    }

    if !lower.is_finite() || !upper.is_finite() || lower == upper {
        return axis_cfg.default_domain.unwrap_or([0.0, 1.0]);
    }

    if axis_cfg.inverted {
        [upper, lower]
    } else {
        [lower, upper]
    }
}

/// Min/max across raw series and stacked group sums, without double-counting
/// any target (`resolve_stack_groups` pins each id to a single group).
fn value_extent(
    targets: &[&Target],
    store: &TargetStore,
    config: &ChartConfig,
    axis: AxisBinding,
) -> Option<(f64, f64)> {
    let groups = resolve_stack_groups(&config.data.groups, store);
    let grouped: Vec<&String> = groups.iter().flatten().collect();

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut observe = |value: f64| {
        if value.is_finite() {
            min = min.min(value);
            max = max.max(value);
        }
    };

    for group in &groups {
        let sums = group_sums(group, store, axis);
        for index in 0..sums.positive.len() {
            observe(sums.positive[index]);
            observe(sums.negative[index]);
        }
    }

    for target in targets {
        if grouped.iter().any(|id| **id == target.id) {
            continue;
        }
        for value in &target.values {
            if let Some(v) = value.value {
                observe(v);
            }
        }
    }

    (min <= max).then_some((min, max))
}

fn resolve_padding(padding: PaddingValue, span: f64, axis_len_px: f64) -> f64 {
    match padding {
        PaddingValue::Ratio(ratio) => span * ratio,
        PaddingValue::Pixels(px) => px_to_domain(px, span, axis_len_px),
    }
}

fn px_to_domain(px: f64, span: f64, axis_len_px: f64) -> f64 {
    if axis_len_px <= 0.0 || !axis_len_px.is_finite() {
        return 0.0;
    }
    px * span / axis_len_px
}

/// Computes the live X domain for numeric and temporal axes. Category axes
/// derive their domain from the category count instead.
#[must_use]
pub fn x_domain(store: &TargetStore, config: &ChartConfig) -> [f64; 2] {
    let x_cfg = &config.axis.x;
    let x_format = config.data.x_format.as_deref();

    let data_extent = store
        .visible()
        .filter_map(Target::x_extent)
        .fold(None::<(f64, f64)>, |acc, (lo, hi)| {
            Some(match acc {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            })
        });

    let explicit_min = x_cfg.min.as_ref().and_then(|b| resolve_x_bound(b, x_format));
    let explicit_max = x_cfg.max.as_ref().and_then(|b| resolve_x_bound(b, x_format));

    let (first, last) = match (data_extent, explicit_min, explicit_max) {
        (Some((lo, hi)), min, max) => (min.unwrap_or(lo), max.unwrap_or(hi)),
        (None, Some(min), Some(max)) => (min, max),
        _ => return [0.0, 1.0],
    };

    // Single data point: synthesize a span around it so the domain never
    // collapses and the point itself stays inside.
    if first == last {
        return if first == 0.0 {
            [1.0, -1.0]
        } else {
            [first * 0.5, first * 1.5]
        };
    }

    let span = last - first;
    let computed = match x_cfg.kind {
        XAxisKind::Category => 0.0,
        _ if store.any_visible_kind(|kind| kind.is_bar()) => {
            let max_count = max_data_count(store);
            if max_count > 1 {
                (span / (max_count - 1) as f64) / 2.0
            } else {
                0.5
            }
        }
        _ => span * 0.01,
    };

    let padding_left = x_cfg.padding_left.unwrap_or(computed);
    let padding_right = x_cfg.padding_right.unwrap_or(computed);
    [first - padding_left, last + padding_right]
}

/// Longest value count across visible targets.
#[must_use]
pub fn max_data_count(store: &TargetStore) -> usize {
    store
        .visible()
        .map(|target| target.values.len())
        .max()
        .unwrap_or(0)
}

pub(crate) fn resolve_x_bound(bound: &AxisBound, x_format: Option<&str>) -> Option<f64> {
    match bound {
        AxisBound::Number(value) => value.is_finite().then_some(*value),
        AxisBound::Time(text) => parse_time_str(
            text,
            x_format.unwrap_or(crate::data::ingest::DEFAULT_X_FORMAT),
        ),
    }
}
