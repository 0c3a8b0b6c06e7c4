//! Self-contained tick-generation and label-layout engine.
//!
//! Parameterized by an edge orientation, an input scale, and layout options;
//! produces a `TickLayout` that is rebuilt on every redraw after the domain
//! is finalized and never cached across redraws.

pub mod labels;
pub mod ticks;

pub use labels::{CharSize, TickTextSource, format_number, format_tick, max_label_width, wrap_label};
pub use ticks::{cull_stride, integer_ticks, nice_ticks, reduce_ticks};

use crate::scale::XScale;

/// Edge the axis is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Top,
    Bottom,
    Left,
    Right,
}

impl AxisOrient {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Translation applied to one tick group for a position along the axis.
    #[must_use]
    pub fn tick_translate(self, position_px: f64) -> (f64, f64) {
        if self.is_horizontal() {
            (position_px, 0.0)
        } else {
            (0.0, position_px)
        }
    }

    /// Axis domain path with outer tick stubs of `outer_px`, spanning
    /// `range`, in the local coordinate space of the axis group.
    #[must_use]
    pub fn domain_path(self, range: (f64, f64), outer_px: f64) -> String {
        let (start, end) = range;
        match self {
            Self::Bottom => format!("M{start},{outer_px}V0H{end}V{outer_px}"),
            Self::Top => format!("M{start},{}V0H{end}V{}", -outer_px, -outer_px),
            Self::Left => format!("M{},{start}H0V{end}H{}", -outer_px, -outer_px),
            Self::Right => format!("M{outer_px},{start}H0V{end}H{outer_px}"),
        }
    }

    /// Inner tick mark line, from the axis toward the plot.
    #[must_use]
    pub fn tick_line(self, size_px: f64) -> (f64, f64, f64, f64) {
        match self {
            Self::Bottom => (0.0, 0.0, 0.0, size_px),
            Self::Top => (0.0, 0.0, 0.0, -size_px),
            Self::Left => (0.0, 0.0, -size_px, 0.0),
            Self::Right => (0.0, 0.0, size_px, 0.0),
        }
    }
}

/// Layout options for one axis pass.
#[derive(Debug, Clone, Copy)]
pub struct AxisLayout {
    pub orient: AxisOrient,
    /// Show the outer (edge) tick stubs on the domain path.
    pub outer_ticks: bool,
    /// Wrap long labels across lines.
    pub multiline: bool,
    /// Label rotation in degrees.
    pub rotate_deg: f64,
    /// Relocate category gridlines to interval midpoints.
    pub centered: bool,
    /// Explicit number of ticks, reduced via endpoint interpolation.
    pub tick_count: Option<usize>,
    /// Maximum displayed tick count; excess ticks are hidden, not removed.
    pub culling_max: Option<usize>,
    /// Fixed label width budget overriding the derived one.
    pub label_width: Option<f64>,
    /// Measured character size; `None` degrades to the default estimate.
    pub char_size: Option<CharSize>,
    /// Treat tick values as temporal during count reduction.
    pub temporal: bool,
}

impl AxisLayout {
    #[must_use]
    pub fn new(orient: AxisOrient) -> Self {
        Self {
            orient,
            outer_ticks: true,
            multiline: true,
            rotate_deg: 0.0,
            centered: false,
            tick_count: None,
            culling_max: None,
            label_width: None,
            char_size: None,
            temporal: false,
        }
    }
}

/// One laid-out tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Pixel position of the label (category labels center in the interval).
    pub label_px: f64,
    /// Pixel position of the gridline/tick mark.
    pub grid_px: f64,
    /// Wrapped label lines.
    pub lines: Vec<String>,
    /// Hidden by culling; stays in the join for index stability.
    pub hidden: bool,
}

/// Axis engine output for one redraw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLayout {
    pub domain: (f64, f64),
    pub ticks: Vec<Tick>,
    pub char_size: CharSize,
    pub rotate_deg: f64,
}

impl TickLayout {
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.ticks.iter().filter(|tick| !tick.hidden).count()
    }
}

/// Default target count for the nice-tick generator.
const DEFAULT_TICK_TARGET: usize = 10;

/// Builds the tick layout for one axis.
pub fn build_tick_layout(
    scale: XScale,
    layout: AxisLayout,
    text: TickTextSource<'_>,
) -> TickLayout {
    let domain = scale.domain();
    let values = generate_tick_values(scale, layout);

    let char_size = layout.char_size.unwrap_or_default();
    let spacing = tick_spacing(scale, &values);
    let budget = max_label_width(
        layout.orient.is_horizontal(),
        scale.is_category(),
        spacing,
        layout.label_width,
    );

    let stride = layout
        .culling_max
        .map(|max| cull_stride(values.len(), max))
        .unwrap_or(1);

    let offset = scale.tick_offset();
    let ticks = values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let edge = scale.scale(value);
            let label_px = edge + offset;
            let grid_px = if layout.centered { label_px } else { edge };
            let label = format_tick(text, value);
            let lines = if layout.multiline {
                wrap_label(&label, budget, char_size)
            } else {
                vec![label]
            };
            Tick {
                value,
                label_px,
                grid_px,
                lines,
                hidden: stride > 1 && index % stride != 0,
            }
        })
        .collect();

    TickLayout {
        domain,
        ticks,
        char_size,
        rotate_deg: layout.rotate_deg,
    }
}

fn generate_tick_values(scale: XScale, layout: AxisLayout) -> Vec<f64> {
    let (start, end) = scale.domain();
    if let Some(count) = layout.tick_count {
        return reduce_ticks(start, end, count, layout.temporal);
    }
    if scale.is_category() {
        integer_ticks(start, end)
    } else {
        nice_ticks(start, end, DEFAULT_TICK_TARGET)
    }
}

fn tick_spacing(scale: XScale, values: &[f64]) -> f64 {
    if values.len() < 2 {
        return scale.range().1 - scale.range().0;
    }
    (scale.scale(values[1]) - scale.scale(values[0])).abs()
}
