//! Resolved chart configuration: serde tree with defaults plus host callbacks.
//!
//! Option resolution is "last write wins": any field the user sets overrides
//! the documented default. The tree is treated as immutable for the duration
//! of one redraw pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::{AxisBinding, ShapeKind};
use crate::error::{ChartError, ChartResult};

/// Axis identity used by domain computation and regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    X,
    #[default]
    Y,
    Y2,
}

/// X axis typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum XAxisKind {
    #[default]
    Indexed,
    Category,
    Timeseries,
}

/// Explicit axis bound: a raw number or a date string parsed with
/// `data.x_format` for timeseries axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisBound {
    Number(f64),
    Time(String),
}

/// Per-side Y padding: a ratio of the domain span or an absolute pixel amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingValue {
    Ratio(f64),
    Pixels(f64),
}

/// Keys used to pull fields out of keyed-JSON input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataKeys {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub rows: Option<Vec<IndexMap<String, JsonValue>>>,
    pub columns: Option<Vec<Vec<JsonValue>>>,
    pub json: Option<JsonValue>,
    pub csv: Option<String>,
    pub tsv: Option<String>,
    pub keys: Option<DataKeys>,
    /// Shared x column id.
    pub x: Option<String>,
    /// Per-target x column mapping (target id -> x column id).
    pub xs: IndexMap<String, String>,
    /// chrono format string for parsing string x values on timeseries axes.
    pub x_format: Option<String>,
    /// Re-sort values by x after ingestion.
    pub x_sort: bool,
    /// Default shape kind applied to targets without an explicit entry.
    #[serde(rename = "type")]
    pub kind: Option<ShapeKind>,
    /// Per-target shape kinds.
    #[serde(rename = "types")]
    pub kinds: IndexMap<String, ShapeKind>,
    /// Stack groups: each inner list is one group, first id is the base.
    pub groups: Vec<Vec<String>>,
    /// Per-target axis binding (default `y`).
    pub axes: IndexMap<String, AxisBinding>,
    /// Display names.
    pub names: IndexMap<String, String>,
    /// Per-target color overrides.
    pub colors: IndexMap<String, String>,
    /// Targets hidden at generation time.
    pub hide: Vec<String>,
    pub labels: DataLabels,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            rows: None,
            columns: None,
            json: None,
            csv: None,
            tsv: None,
            keys: None,
            x: None,
            xs: IndexMap::new(),
            x_format: None,
            x_sort: true,
            kind: None,
            kinds: IndexMap::new(),
            groups: Vec::new(),
            axes: IndexMap::new(),
            names: IndexMap::new(),
            colors: IndexMap::new(),
            hide: Vec::new(),
            labels: DataLabels::default(),
        }
    }
}

impl DataConfig {
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.rows.is_some()
            || self.columns.is_some()
            || self.json.is_some()
            || self.csv.is_some()
            || self.tsv.is_some()
    }

    /// Resolves the shape kind for one target id.
    #[must_use]
    pub fn kind_for(&self, id: &str) -> ShapeKind {
        self.kinds
            .get(id)
            .copied()
            .or(self.kind)
            .unwrap_or(ShapeKind::Line)
    }

    /// Resolves the axis binding for one target id.
    #[must_use]
    pub fn axis_for(&self, id: &str) -> AxisBinding {
        self.axes.get(id).copied().unwrap_or(AxisBinding::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataLabels {
    pub show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XTickConfig {
    /// Explicit number of ticks (endpoints plus interpolated interior).
    pub count: Option<usize>,
    /// Enable display-only tick culling.
    pub culling: Option<bool>,
    /// Maximum ticks shown when culling applies.
    pub culling_max: usize,
    /// Label rotation in degrees.
    pub rotate: f64,
    /// Wrap long labels across lines.
    pub multiline: bool,
    /// Fixed label width budget in pixels, overriding the derived budget.
    pub width: Option<f64>,
    /// Show the outer (edge) ticks.
    pub outer: bool,
    /// Relocate category gridlines to interval midpoints.
    pub centered: bool,
}

impl Default for XTickConfig {
    fn default() -> Self {
        Self {
            count: None,
            culling: None,
            culling_max: 10,
            rotate: 0.0,
            multiline: true,
            width: None,
            outer: true,
            centered: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XAxisConfig {
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: XAxisKind,
    pub categories: Vec<String>,
    pub min: Option<AxisBound>,
    pub max: Option<AxisBound>,
    /// Extra domain padding per side, in x units.
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
    pub tick: XTickConfig,
    pub height: Option<f64>,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            show: true,
            kind: XAxisKind::Indexed,
            categories: Vec::new(),
            min: None,
            max: None,
            padding_left: None,
            padding_right: None,
            tick: XTickConfig::default(),
            height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct YTickConfig {
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YAxisConfig {
    pub show: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Re-center the domain symmetrically around this value.
    pub center: Option<f64>,
    pub inverted: bool,
    /// Force or forbid zero-basing; `None` derives the default from the
    /// present shape kinds (bar/area types zero-base).
    pub zero_based: Option<bool>,
    pub padding_top: Option<PaddingValue>,
    pub padding_bottom: Option<PaddingValue>,
    pub tick: YTickConfig,
    /// Domain used when there is no visible data bound to this axis.
    pub default_domain: Option<[f64; 2]>,
}

impl Default for YAxisConfig {
    fn default() -> Self {
        Self {
            show: true,
            min: None,
            max: None,
            center: None,
            inverted: false,
            zero_based: None,
            padding_top: None,
            padding_bottom: None,
            tick: YTickConfig::default(),
            default_domain: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AxisConfig {
    /// Swap the X/Y role of every geometry formula.
    pub rotated: bool,
    pub x: XAxisConfig,
    pub y: YAxisConfig,
    pub y2: YAxisConfig,
    /// `y2` participates only when enabled here or bound via `data.axes`.
    pub y2_show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GridLinesConfig {
    pub show: bool,
}

/// Full-length gridlines at tick positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GridConfig {
    pub x: GridLinesConfig,
    pub y: GridLinesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub show: bool,
    /// Targets excluded from the legend but still drawn.
    pub hide: Vec<String>,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            show: true,
            hide: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub show: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self { show: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ZoomConfig {
    pub enabled: bool,
    /// Smallest x-domain window the user can zoom into, in x units.
    pub min_window: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubchartConfig {
    pub show: bool,
    pub height: f64,
}

impl Default for SubchartConfig {
    fn default() -> Self {
        Self {
            show: false,
            height: 60.0,
        }
    }
}

/// Used when the configured pattern is empty and no per-target color exists.
pub const DEFAULT_TARGET_COLOR: &str = "#1f77b4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub pattern: Vec<String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            pattern: vec![
                "#1f77b4".to_owned(),
                "#ff7f0e".to_owned(),
                "#2ca02c".to_owned(),
                "#d62728".to_owned(),
                "#9467bd".to_owned(),
                "#8c564b".to_owned(),
                "#e377c2".to_owned(),
                "#7f7f7f".to_owned(),
                "#bcbd22".to_owned(),
                "#17becf".to_owned(),
            ],
        }
    }
}

impl ColorConfig {
    /// Resolves a target color by registry position, cycling the pattern.
    #[must_use]
    pub fn color_at(&self, position: usize) -> &str {
        if self.pattern.is_empty() {
            return DEFAULT_TARGET_COLOR;
        }
        &self.pattern[position % self.pattern.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration_ms: 350 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub enabled: bool,
    /// Pixel radius for closest-point hit-testing.
    pub sensitivity: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SizeConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Highlighted x/y region used for sub-path styling of crossing lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub axis: AxisId,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub label: Option<String>,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            axis: AxisId::X,
            start: None,
            end: None,
            label: None,
        }
    }
}

/// Full recognized option tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChartConfig {
    pub data: DataConfig,
    pub axis: AxisConfig,
    pub grid: GridConfig,
    pub legend: LegendConfig,
    pub tooltip: TooltipConfig,
    pub zoom: ZoomConfig,
    pub subchart: SubchartConfig,
    pub color: ColorConfig,
    pub transition: TransitionConfig,
    pub interaction: InteractionConfig,
    pub size: SizeConfig,
    pub regions: Vec<Region>,
}

impl ChartConfig {
    /// Rejects contradictory or unusable settings before the first layout.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.data.has_source() {
            return Err(ChartError::NoDataSource);
        }

        for axis in [&self.axis.y, &self.axis.y2] {
            for padding in [axis.padding_top, axis.padding_bottom]
                .into_iter()
                .flatten()
            {
                let raw = match padding {
                    PaddingValue::Ratio(value) | PaddingValue::Pixels(value) => value,
                };
                if !raw.is_finite() || raw < 0.0 {
                    return Err(ChartError::InvalidConfig(
                        "axis padding must be finite and >= 0".to_owned(),
                    ));
                }
            }
            if let (Some(min), Some(max)) = (axis.min, axis.max)
                && min > max
            {
                return Err(ChartError::InvalidConfig(
                    "axis min must not exceed axis max".to_owned(),
                ));
            }
        }

        if let Some(window) = self.zoom.min_window
            && (!window.is_finite() || window <= 0.0)
        {
            return Err(ChartError::InvalidConfig(
                "zoom min window must be finite and > 0".to_owned(),
            ));
        }

        if !self.interaction.sensitivity.is_finite() || self.interaction.sensitivity < 0.0 {
            return Err(ChartError::InvalidConfig(
                "interaction sensitivity must be finite and >= 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Resolves the display color for a target: an explicit `data.colors`
    /// entry wins, otherwise the pattern cycles by target position.
    pub fn color_for(&self, id: &str, position: usize) -> String {
        if let Some(color) = self.data.colors.get(id) {
            return color.clone();
        }
        self.color.color_at(position).to_owned()
    }
}

/// Lifecycle callbacks, kept outside the serde tree.
///
/// Every callback is invoked only while the chart handle is alive; late
/// transition barriers on a destroyed chart are dropped silently.
#[derive(Default)]
pub struct ChartCallbacks {
    pub on_init: Option<Box<dyn FnMut()>>,
    pub on_rendered: Option<Box<dyn FnMut()>>,
    pub on_resize: Option<Box<dyn FnMut(u32, u32)>>,
    pub on_resized: Option<Box<dyn FnMut(u32, u32)>>,
}

impl std::fmt::Debug for ChartCallbacks {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ChartCallbacks")
            .field("on_init", &self.on_init.is_some())
            .field("on_rendered", &self.on_rendered.is_some())
            .field("on_resize", &self.on_resize.is_some())
            .field("on_resized", &self.on_resized.is_some())
            .finish()
    }
}
