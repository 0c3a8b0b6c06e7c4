//! Canonical series representation shared by every downstream component.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed set of shape families. The kind is resolved once at ingestion time;
/// downstream code matches on the enum instead of probing for optional
/// per-type handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Line,
    Spline,
    Step,
    Area,
    AreaSpline,
    AreaStep,
    Bar,
    Scatter,
    Pie,
    Donut,
    Gauge,
}

impl ShapeKind {
    /// Line-family kinds render as connected paths and honor `None` gaps.
    #[must_use]
    pub fn is_line_family(self) -> bool {
        matches!(
            self,
            Self::Line | Self::Spline | Self::Step | Self::Area | Self::AreaSpline | Self::AreaStep
        )
    }

    #[must_use]
    pub fn is_area(self) -> bool {
        matches!(self, Self::Area | Self::AreaSpline | Self::AreaStep)
    }

    #[must_use]
    pub fn is_step(self) -> bool {
        matches!(self, Self::Step | Self::AreaStep)
    }

    #[must_use]
    pub fn is_bar(self) -> bool {
        self == Self::Bar
    }

    #[must_use]
    pub fn is_arc(self) -> bool {
        matches!(self, Self::Pie | Self::Donut | Self::Gauge)
    }

    /// Kinds that may participate in stack groups.
    #[must_use]
    pub fn is_stackable(self) -> bool {
        self.is_bar() || self.is_area()
    }

    /// Kinds whose Y domain defaults to including zero.
    #[must_use]
    pub fn zero_based_by_default(self) -> bool {
        self.is_bar() || self.is_area()
    }
}

/// Y axis a target is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisBinding {
    #[default]
    Y,
    Y2,
}

/// One observation within a target.
///
/// `index` is a dense 0-based sequence matching sorted x order when sorting
/// is enabled. `value == None` marks an explicit gap; gaps are only
/// meaningful for line-family kinds and are rejected by stacking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub x: f64,
    pub value: Option<f64>,
    pub index: usize,
}

impl Value {
    #[must_use]
    pub fn new(x: f64, value: Option<f64>, index: usize) -> Self {
        Self { x, value, index }
    }

    /// `true` when the x position can participate in domain math.
    #[must_use]
    pub fn has_position(self) -> bool {
        self.x.is_finite()
    }
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub kind: ShapeKind,
    pub axis: AxisBinding,
    pub values: Vec<Value>,
    pub hidden: bool,
    pub legend_hidden: bool,
}

impl Target {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ShapeKind, values: Vec<Value>) -> Self {
        Self {
            id: id.into(),
            kind,
            axis: AxisBinding::Y,
            values,
            hidden: false,
            legend_hidden: false,
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisBinding) -> Self {
        self.axis = axis;
        self
    }

    /// Minimum and maximum finite x across values, if any.
    #[must_use]
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for value in &self.values {
            if !value.has_position() {
                continue;
            }
            extent = Some(match extent {
                Some((min, max)) => (min.min(value.x), max.max(value.x)),
                None => (value.x, value.x),
            });
        }
        extent
    }

    /// Value at an exact x, else the nearest-index fallback used when
    /// heterogeneous x sets are stacked.
    #[must_use]
    pub fn value_on_x(&self, x: f64, index_fallback: usize) -> Option<&Value> {
        self.values
            .iter()
            .find(|value| value.x == x)
            .or_else(|| self.values.get(index_fallback))
    }
}

/// Insertion-ordered target registry.
#[derive(Debug, Clone, Default)]
pub struct TargetStore {
    targets: IndexMap<String, Target>,
}

impl TargetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: Target) {
        self.targets.insert(target.id.clone(), target);
    }

    /// Replaces a target if present, otherwise appends it.
    pub fn upsert(&mut self, target: Target) {
        self.insert(target);
    }

    pub fn remove(&mut self, id: &str) -> Option<Target> {
        self.targets.shift_remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Target> {
        self.targets.get_mut(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Position of a target in registry order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.targets.get_index_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Target> {
        self.targets.values_mut()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Target> {
        self.targets.values().filter(|target| !target.hidden)
    }

    /// Visible targets bound to one axis.
    pub fn visible_on(&self, axis: AxisBinding) -> impl Iterator<Item = &Target> {
        self.visible().filter(move |target| target.axis == axis)
    }

    /// `true` when every visible target exposes an identical x sequence.
    #[must_use]
    pub fn shares_single_x(&self) -> bool {
        let mut reference: Option<Vec<f64>> = None;
        for target in self.visible() {
            let xs: Vec<f64> = target.values.iter().map(|value| value.x).collect();
            match &reference {
                Some(existing) if *existing != xs => return false,
                Some(_) => {}
                None => reference = Some(xs),
            }
        }
        true
    }

    /// `true` when any visible target has the given kind predicate.
    #[must_use]
    pub fn any_visible_kind(&self, predicate: impl Fn(ShapeKind) -> bool) -> bool {
        self.visible().any(|target| predicate(target.kind))
    }
}
