//! The redraw pipeline: layout, scale building and scene population.
//!
//! One redraw is a pure function of the target store, the config and the
//! current viewport. Scales are rebuilt from scratch every pass and handed
//! down by value; nothing downstream holds a stale mapping. The pass ends by
//! arming a barrier over every transition it started, which the chart polls
//! from its tick loop.

pub mod resize;

pub use resize::ChartId;

use tracing::debug;

use crate::anim::{Barrier, Easing};
use crate::axis::{
    AxisLayout, AxisOrient, CharSize, TickLayout, TickTextSource, build_tick_layout,
    format_number, nice_ticks,
};
use crate::config::{AxisId, ChartConfig, XAxisKind};
use crate::data::{AxisBinding, FlowPlan, ShapeKind, TargetStore};
use crate::error::ChartResult;
use crate::interact::{EventRect, EventRectMode, event_rect_mode, multiple_x_rect, single_x_rects};
use crate::render::{
    ArcPrimitive, CirclePrimitive, Layer, PathPrimitive, PolygonPrimitive, Primitive,
    RectPrimitive, ReconcileStats, SceneGraph, SceneKey, TextPrimitive, Viewport,
};
use crate::scale::{
    CategoryScale, LinearScale, XScale, max_data_count, resolve_stack_groups, x_domain, y_domain,
};
use crate::shape::{
    BarRect, BarSlot, Point, ShapeScales, arc_layout, area_band, bar_rects, gauge_layout,
    line_points,
};

/// Fraction of one tick interval occupied by the bar lanes.
pub const BAR_WIDTH_RATIO: f64 = 0.6;
/// Opacity applied to targets outside the focused set.
pub const FOCUS_DIM_OPACITY: f64 = 0.3;
/// Marker radius for scatter values and line-point markers.
const POINT_RADIUS_PX: f64 = 2.5;
/// Arc charts leave this fraction of the plot radius as breathing room.
const ARC_RADIUS_RATIO: f64 = 0.95;
/// Gauge value range when the config gives none.
const GAUGE_DEFAULT_MIN: f64 = 0.0;
const GAUGE_DEFAULT_MAX: f64 = 100.0;

const NO_DATA_TEXT: &str = "No Data";

const MARGIN_TOP: f64 = 4.0;
const MARGIN_LEFT: f64 = 40.0;
const MARGIN_RIGHT_PLAIN: f64 = 10.0;
const MARGIN_RIGHT_Y2: f64 = 40.0;
const X_AXIS_HEIGHT: f64 = 20.0;
const LEGEND_HEIGHT: f64 = 24.0;
const Y_LABEL_GAP_PX: f64 = 8.0;

/// Pixel margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Resolved plot-area geometry for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub viewport: Viewport,
    pub margin: Margin,
    /// Plot-area width in pixels, margins excluded.
    pub width: f64,
    /// Plot-area height in pixels, margins excluded.
    pub height: f64,
}

impl PlotLayout {
    /// Derives the plot area from the viewport and the config's axis,
    /// legend and subchart demands.
    pub fn compute(viewport: Viewport, config: &ChartConfig) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(crate::error::ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let x_axis = if config.axis.x.show {
            config.axis.x.height.unwrap_or(X_AXIS_HEIGHT)
        } else {
            0.0
        };
        let legend = if config.legend.show { LEGEND_HEIGHT } else { 0.0 };
        let subchart = if config.subchart.show {
            config.subchart.height
        } else {
            0.0
        };
        let y2_shown = config.axis.y2_show && config.axis.y2.show;

        let margin = if config.axis.rotated {
            Margin {
                top: MARGIN_TOP,
                right: MARGIN_RIGHT_PLAIN,
                bottom: x_axis + legend + subchart,
                left: MARGIN_LEFT,
            }
        } else {
            Margin {
                top: MARGIN_TOP,
                right: if y2_shown {
                    MARGIN_RIGHT_Y2
                } else {
                    MARGIN_RIGHT_PLAIN
                },
                bottom: x_axis + legend + subchart,
                left: if config.axis.y.show { MARGIN_LEFT } else { 1.0 },
            }
        };

        let width = (f64::from(viewport.width) - margin.left - margin.right).max(1.0);
        let height = (f64::from(viewport.height) - margin.top - margin.bottom).max(1.0);
        Ok(Self {
            viewport,
            margin,
            width,
            height,
        })
    }
}

/// Immutable scale set for one pass.
#[derive(Debug, Clone, Copy)]
pub struct RedrawScales {
    pub x: XScale,
    pub y: LinearScale,
    pub y2: LinearScale,
    pub rotated: bool,
}

impl RedrawScales {
    /// Scale pair for shape generation on one Y axis.
    #[must_use]
    pub fn shape(&self, axis: AxisBinding) -> ShapeScales {
        ShapeScales {
            x: self.x,
            y: match axis {
                AxisBinding::Y => self.y,
                AxisBinding::Y2 => self.y2,
            },
            rotated: self.rotated,
        }
    }
}

/// Builds the scales for one pass.
///
/// The x scale keeps the full data domain as its canonical (org) domain;
/// an active zoom window narrows only the live domain. Category axes ignore
/// the zoom window.
pub fn build_scales(
    store: &TargetStore,
    config: &ChartConfig,
    categories: &[String],
    layout: &PlotLayout,
    zoom_window: Option<[f64; 2]>,
) -> ChartResult<RedrawScales> {
    let rotated = config.axis.rotated;
    let (x_len, y_len) = if rotated {
        (layout.height, layout.width)
    } else {
        (layout.width, layout.height)
    };

    let x = if config.axis.x.kind == XAxisKind::Category {
        let count = categories.len().max(max_data_count(store)).max(1);
        XScale::Category(CategoryScale::new(count, 0.0, x_len)?)
    } else {
        let [lo, hi] = x_domain(store, config);
        let mut scale = LinearScale::new(lo, hi, 0.0, x_len)?;
        if let Some([zoom_lo, zoom_hi]) = zoom_window {
            scale = scale.with_domain(zoom_lo, zoom_hi)?;
        }
        XScale::Linear(scale)
    };

    let [y_lo, y_hi] = y_domain(store, config, AxisBinding::Y, y_len);
    let [y2_lo, y2_hi] = y_domain(store, config, AxisBinding::Y2, y_len);
    let y = LinearScale::new(y_lo, y_hi, y_len, 0.0)?;
    let y2 = LinearScale::new(y2_lo, y2_hi, y_len, 0.0)?;

    Ok(RedrawScales { x, y, y2, rotated })
}

/// Per-pass behavior switches; presets cover the common entry points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RedrawOptions {
    /// Transition duration; zero snaps every attribute.
    pub duration_ms: u32,
    /// Entering nodes fade from transparent.
    pub fade_in: bool,
    /// Streaming shift scheduled by `apply_flow`.
    pub flow: Option<FlowPlan>,
}

impl RedrawOptions {
    /// Initial render or incremental data load.
    #[must_use]
    pub fn load(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            fade_in: true,
            flow: None,
        }
    }

    /// Viewport change: recompute everything, no transition.
    #[must_use]
    pub fn resize() -> Self {
        Self::default()
    }

    /// Zoom or pan: animate the domain remap, no enter fade.
    #[must_use]
    pub fn zoom(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            fade_in: false,
            flow: None,
        }
    }

    /// Streaming flow step.
    #[must_use]
    pub fn flow(plan: FlowPlan, duration_ms: u32) -> Self {
        Self {
            duration_ms,
            fade_in: true,
            flow: Some(plan),
        }
    }
}

/// Everything a pass reads; built fresh by the chart for each redraw.
#[derive(Debug, Clone, Copy)]
pub struct RedrawContext<'a> {
    pub store: &'a TargetStore,
    pub config: &'a ChartConfig,
    pub categories: &'a [String],
    pub layout: &'a PlotLayout,
    pub scales: &'a RedrawScales,
    /// Focused target ids; everything else dims. `None` means no focus.
    pub focus: Option<&'a [String]>,
    pub now_ms: u64,
}

/// Pass output the chart keeps for ticking and hit-testing.
#[derive(Debug)]
pub struct RedrawOutput {
    pub stats: ReconcileStats,
    pub barrier: Barrier,
    pub x_ticks: TickLayout,
    /// Bar geometry of this pass, reused by pointer hit-testing.
    pub bars: Vec<(String, Vec<BarRect>)>,
    pub event_rects: Vec<EventRect>,
}

/// Runs one full redraw pass against the scene graph.
pub fn run_redraw(
    scene: &mut SceneGraph,
    ctx: RedrawContext<'_>,
    options: RedrawOptions,
) -> ChartResult<RedrawOutput> {
    let duration = options.duration_ms;
    let easing = Easing::CubicInOut;
    let mut stats = ReconcileStats::default();

    let merge = |pass: ReconcileStats, stats: &mut ReconcileStats| {
        stats.entered += pass.entered;
        stats.updated += pass.updated;
        stats.exited += pass.exited;
        stats.started.extend(pass.started);
    };

    if ctx.store.visible().next().is_none() {
        // Nothing to draw: every layer exits and a placeholder label takes
        // the plot center. Domain math is skipped entirely.
        for layer in [
            Layer::Grid,
            Layer::Region,
            Layer::Area,
            Layer::Bar,
            Layer::Line,
            Layer::Arc,
            Layer::Axis,
            Layer::Label,
            Layer::EventRect,
        ] {
            let pass = scene.reconcile(layer, Vec::new(), duration, ctx.now_ms, easing, false);
            merge(pass, &mut stats);
        }
        let placeholder = vec![(
            SceneKey::new(Layer::NoData, "empty", 0),
            Primitive::Text(TextPrimitive {
                x: ctx.layout.width / 2.0,
                y: ctx.layout.height / 2.0,
                lines: vec![NO_DATA_TEXT.to_owned()],
                rotate_deg: 0.0,
                class_name: "empty".to_owned(),
                opacity: 1.0,
            }),
        )];
        let pass = scene.reconcile(Layer::NoData, placeholder, duration, ctx.now_ms, easing, false);
        merge(pass, &mut stats);

        let barrier = Barrier::arm(stats.started.clone(), ctx.now_ms, duration);
        return Ok(RedrawOutput {
            stats,
            barrier,
            x_ticks: TickLayout {
                domain: (0.0, 1.0),
                ticks: Vec::new(),
                char_size: CharSize::default(),
                rotate_deg: 0.0,
            },
            bars: Vec::new(),
            event_rects: Vec::new(),
        });
    }

    let pass = scene.reconcile(Layer::NoData, Vec::new(), duration, ctx.now_ms, easing, false);
    merge(pass, &mut stats);

    let groups = resolve_stack_groups(&ctx.config.data.groups, ctx.store);
    let x_ticks = build_x_ticks(ctx);
    let flow_shift = options
        .flow
        .map(|plan| flow_shift_px(ctx.store, plan, ctx.scales.x))
        .unwrap_or(0.0);

    let bars = build_bar_geometry(ctx, &groups);

    let layers = [
        (Layer::Grid, grid_nodes(ctx, &x_ticks)),
        (Layer::Region, region_nodes(ctx)),
        (Layer::Area, area_nodes(ctx, &groups, flow_shift)),
        (Layer::Bar, bar_nodes(ctx, &bars, flow_shift)),
        (Layer::Line, line_nodes(ctx, flow_shift)),
        (Layer::Arc, arc_nodes(ctx)),
        (Layer::Axis, axis_nodes(ctx, &x_ticks)),
        (Layer::Label, label_nodes(ctx)),
    ];
    for (layer, desired) in layers {
        let fade = options.fade_in && layer != Layer::Axis && layer != Layer::Grid;
        let pass = scene.reconcile(layer, desired, duration, ctx.now_ms, easing, fade);
        merge(pass, &mut stats);
    }

    // Event rects never animate; they resize with the pass.
    let event_rects = build_event_rects(ctx);
    let desired = event_rects
        .iter()
        .enumerate()
        .map(|(slot, rect)| {
            (
                SceneKey::new(Layer::EventRect, "event", slot),
                Primitive::Rect(RectPrimitive {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    class_name: "event-rect".to_owned(),
                    opacity: 0.0,
                }),
            )
        })
        .collect();
    let pass = scene.reconcile(Layer::EventRect, desired, 0, ctx.now_ms, easing, false);
    merge(pass, &mut stats);

    let barrier = Barrier::arm(stats.started.clone(), ctx.now_ms, duration);
    debug!(
        entered = stats.entered,
        updated = stats.updated,
        exited = stats.exited,
        transitions = stats.started.len(),
        "redraw pass reconciled"
    );

    Ok(RedrawOutput {
        stats,
        barrier,
        x_ticks,
        bars,
        event_rects,
    })
}

/// Pixel width of the head window a flow pass slides out of view.
#[must_use]
pub fn flow_shift_px(store: &TargetStore, plan: FlowPlan, x: XScale) -> f64 {
    if plan.shifted == 0 {
        return 0.0;
    }
    let Some(target) = store.iter().next() else {
        return 0.0;
    };
    let values = &target.values;
    if values.is_empty() {
        return 0.0;
    }
    let head = values[0].x;
    let edge = values
        .get(plan.shifted)
        .or_else(|| values.last())
        .map(|value| value.x)
        .unwrap_or(head);
    (x.scale(edge) - x.scale(head)).abs()
}

fn build_x_ticks(ctx: RedrawContext<'_>) -> TickLayout {
    let x_cfg = &ctx.config.axis.x;
    let orient = if ctx.config.axis.rotated {
        AxisOrient::Left
    } else {
        AxisOrient::Bottom
    };
    let temporal = x_cfg.kind == XAxisKind::Timeseries;
    let culling = x_cfg.tick.culling.unwrap_or(temporal);

    let mut layout = AxisLayout::new(orient);
    layout.outer_ticks = x_cfg.tick.outer;
    layout.multiline = x_cfg.tick.multiline;
    layout.rotate_deg = x_cfg.tick.rotate;
    layout.centered = x_cfg.tick.centered;
    layout.tick_count = x_cfg.tick.count;
    layout.culling_max = culling.then_some(x_cfg.tick.culling_max);
    layout.label_width = x_cfg.tick.width;
    layout.temporal = temporal;

    let x_format = ctx
        .config
        .data
        .x_format
        .as_deref()
        .unwrap_or(crate::data::ingest::DEFAULT_X_FORMAT);
    let text = match x_cfg.kind {
        XAxisKind::Category => TickTextSource::Categories(ctx.categories),
        XAxisKind::Timeseries => TickTextSource::Time(x_format),
        XAxisKind::Indexed => TickTextSource::Number,
    };
    build_tick_layout(ctx.scales.x, layout, text)
}

/// Lane assignment for side-by-side bars: ungrouped bar targets own one lane
/// each; a stack group's bar members share the lane of their first member.
fn bar_lane_map(ctx: RedrawContext<'_>, groups: &[Vec<String>]) -> Vec<(String, usize)> {
    let mut lanes: Vec<(String, usize)> = Vec::new();
    let mut next_lane = 0usize;
    let mut group_lane: Vec<(usize, usize)> = Vec::new();

    for target in ctx.store.visible() {
        if !target.kind.is_bar() {
            continue;
        }
        let group = groups.iter().position(|group| group.contains(&target.id));
        let lane = match group {
            Some(position) => {
                match group_lane.iter().find(|(g, _)| *g == position) {
                    Some((_, lane)) => *lane,
                    None => {
                        let lane = next_lane;
                        next_lane += 1;
                        group_lane.push((position, lane));
                        lane
                    }
                }
            }
            None => {
                let lane = next_lane;
                next_lane += 1;
                lane
            }
        };
        lanes.push((target.id.clone(), lane));
    }
    lanes
}

fn tick_interval_px(ctx: RedrawContext<'_>) -> f64 {
    match ctx.scales.x {
        XScale::Category(scale) => scale.step(),
        XScale::Linear(scale) => {
            let count = max_data_count(ctx.store);
            scale.range_len() / count.saturating_sub(1).max(1) as f64
        }
    }
}

fn build_bar_geometry(
    ctx: RedrawContext<'_>,
    groups: &[Vec<String>],
) -> Vec<(String, Vec<BarRect>)> {
    let lanes = bar_lane_map(ctx, groups);
    if lanes.is_empty() {
        return Vec::new();
    }
    let lane_count = lanes.iter().map(|(_, lane)| lane + 1).max().unwrap_or(1);
    let interval = tick_interval_px(ctx);

    lanes
        .into_iter()
        .filter_map(|(id, lane)| {
            let target = ctx.store.get(&id)?;
            let slot = BarSlot::for_lane(interval, BAR_WIDTH_RATIO, lane_count, lane);
            let scales = ctx.scales.shape(target.axis);
            Some((id, bar_rects(target, ctx.store, groups, scales, slot)))
        })
        .collect()
}

fn target_opacity(focus: Option<&[String]>, id: &str) -> f64 {
    match focus {
        Some(focused) if !focused.iter().any(|f| f == id) => FOCUS_DIM_OPACITY,
        _ => 1.0,
    }
}

fn line_nodes(ctx: RedrawContext<'_>, flow_shift: f64) -> Vec<(SceneKey, Primitive)> {
    let mut nodes = Vec::new();
    for target in ctx.store.visible() {
        let opacity = target_opacity(ctx.focus, &target.id);
        let scales = ctx.scales.shape(target.axis);
        if target.kind.is_line_family() {
            let anchors = if target.kind.is_step() {
                crate::shape::line::project_values(
                    &crate::shape::step_points(&target.values),
                    scales,
                )
            } else {
                line_points(target, scales)
            };
            let points = anchors
                .into_iter()
                .map(|anchor| anchor.map(|points| points[0]))
                .collect();
            nodes.push((
                SceneKey::new(Layer::Line, target.id.clone(), 0),
                Primitive::Path(PathPrimitive {
                    points,
                    closed: false,
                    class_name: format!("line-{}", target.id),
                    opacity,
                    translate_x: -flow_shift,
                }),
            ));
        } else if target.kind == ShapeKind::Scatter {
            for value in &target.values {
                let (Some(v), true) = (value.value, value.has_position()) else {
                    continue;
                };
                nodes.push((
                    SceneKey::new(Layer::Line, target.id.clone(), value.index + 1),
                    Primitive::Circle(CirclePrimitive {
                        center: scales.project(value.x, v),
                        radius: POINT_RADIUS_PX,
                        class_name: format!("point-{}", target.id),
                        opacity,
                    }),
                ));
            }
        }
    }
    nodes
}

fn area_nodes(
    ctx: RedrawContext<'_>,
    groups: &[Vec<String>],
    flow_shift: f64,
) -> Vec<(SceneKey, Primitive)> {
    let mut nodes = Vec::new();
    for target in ctx.store.visible() {
        if !target.kind.is_area() {
            continue;
        }
        let scales = ctx.scales.shape(target.axis);
        let band = area_band(target, ctx.store, groups, scales);
        // Closed outline: upper edge out, lower edge back.
        let mut points: Vec<Option<Point>> = band.upper;
        points.extend(band.lower.into_iter().rev());
        nodes.push((
            SceneKey::new(Layer::Area, target.id.clone(), 0),
            Primitive::Path(PathPrimitive {
                points,
                closed: true,
                class_name: format!("area-{}", target.id),
                opacity: target_opacity(ctx.focus, &target.id),
                translate_x: -flow_shift,
            }),
        ));
    }
    nodes
}

fn bar_nodes(
    ctx: RedrawContext<'_>,
    bars: &[(String, Vec<BarRect>)],
    flow_shift: f64,
) -> Vec<(SceneKey, Primitive)> {
    let mut nodes = Vec::new();
    for (id, rects) in bars {
        let opacity = target_opacity(ctx.focus, id);
        for rect in rects {
            nodes.push((
                SceneKey::new(Layer::Bar, id.clone(), rect.index),
                Primitive::Polygon(PolygonPrimitive {
                    corners: rect.corners.to_vec(),
                    class_name: format!("bar-{id}"),
                    opacity,
                    translate_x: -flow_shift,
                }),
            ));
        }
    }
    nodes
}

fn arc_nodes(ctx: RedrawContext<'_>) -> Vec<(SceneKey, Primitive)> {
    let center = Point::new(ctx.layout.width / 2.0, ctx.layout.height / 2.0);
    let radius = (ctx.layout.width.min(ctx.layout.height) / 2.0) * ARC_RADIUS_RATIO;

    let mut nodes: Vec<(SceneKey, Primitive)> = arc_layout(ctx.store)
        .into_iter()
        .enumerate()
        .map(|(slot, geometry)| {
            let opacity = target_opacity(ctx.focus, &geometry.id);
            (
                SceneKey::new(Layer::Arc, geometry.id.clone(), slot),
                Primitive::Arc(ArcPrimitive {
                    center,
                    radius,
                    start_angle: geometry.start_angle,
                    end_angle: geometry.end_angle,
                    inner_radius_ratio: geometry.inner_radius_ratio,
                    class_name: format!("arc-{}", geometry.id),
                    opacity,
                }),
            )
        })
        .collect();

    for target in ctx.store.visible() {
        if target.kind != ShapeKind::Gauge {
            continue;
        }
        let geometry = gauge_layout(target, GAUGE_DEFAULT_MIN, GAUGE_DEFAULT_MAX);
        nodes.push((
            SceneKey::new(Layer::Arc, target.id.clone(), 0),
            Primitive::Arc(ArcPrimitive {
                center,
                radius,
                start_angle: geometry.start_angle,
                end_angle: geometry.end_angle,
                inner_radius_ratio: geometry.inner_radius_ratio,
                class_name: format!("gauge-{}", target.id),
                opacity: target_opacity(ctx.focus, &target.id),
            }),
        ));
    }
    nodes
}

fn axis_nodes(ctx: RedrawContext<'_>, x_ticks: &TickLayout) -> Vec<(SceneKey, Primitive)> {
    let mut nodes = Vec::new();
    let rotated = ctx.config.axis.rotated;
    let plot_h = ctx.layout.height;
    let plot_w = ctx.layout.width;

    if ctx.config.axis.x.show {
        for (slot, tick) in x_ticks.ticks.iter().enumerate() {
            // Culling hides the label without dropping the node, so the
            // data-join stays index-stable across passes.
            let opacity = if tick.hidden { 0.0 } else { 1.0 };
            let (x, y) = if rotated {
                (-Y_LABEL_GAP_PX, tick.label_px)
            } else {
                (tick.label_px, plot_h + x_ticks.char_size.height)
            };
            nodes.push((
                SceneKey::new(Layer::Axis, "x", slot),
                Primitive::Text(TextPrimitive {
                    x,
                    y,
                    lines: tick.lines.clone(),
                    rotate_deg: x_ticks.rotate_deg,
                    class_name: "axis-x".to_owned(),
                    opacity,
                }),
            ));
        }
    }

    let y_axes: [(&str, LinearScale, bool); 2] = [
        ("y", ctx.scales.y, ctx.config.axis.y.show),
        (
            "y2",
            ctx.scales.y2,
            ctx.config.axis.y2_show && ctx.config.axis.y2.show,
        ),
    ];
    for (id, scale, shown) in y_axes {
        if !shown {
            continue;
        }
        let count = match id {
            "y" => ctx.config.axis.y.tick.count,
            _ => ctx.config.axis.y2.tick.count,
        };
        let (lo, hi) = scale.domain();
        let values = nice_ticks(lo, hi, count.unwrap_or(10));
        for (slot, value) in values.into_iter().enumerate() {
            let position = scale.scale(value);
            let (x, y) = if rotated {
                (position, plot_h + x_ticks.char_size.height)
            } else if id == "y2" {
                (plot_w + Y_LABEL_GAP_PX, position)
            } else {
                (-Y_LABEL_GAP_PX, position)
            };
            nodes.push((
                SceneKey::new(Layer::Axis, id, slot),
                Primitive::Text(TextPrimitive {
                    x,
                    y,
                    lines: vec![format_number(value)],
                    rotate_deg: 0.0,
                    class_name: format!("axis-{id}"),
                    opacity: 1.0,
                }),
            ));
        }
    }
    nodes
}

fn grid_nodes(ctx: RedrawContext<'_>, x_ticks: &TickLayout) -> Vec<(SceneKey, Primitive)> {
    let mut nodes = Vec::new();
    let rotated = ctx.config.axis.rotated;
    let plot_h = ctx.layout.height;
    let plot_w = ctx.layout.width;

    if ctx.config.grid.x.show {
        for (slot, tick) in x_ticks.ticks.iter().enumerate() {
            let points = if rotated {
                vec![
                    Some(Point::new(0.0, tick.grid_px)),
                    Some(Point::new(plot_w, tick.grid_px)),
                ]
            } else {
                vec![
                    Some(Point::new(tick.grid_px, 0.0)),
                    Some(Point::new(tick.grid_px, plot_h)),
                ]
            };
            nodes.push((
                SceneKey::new(Layer::Grid, "x", slot),
                Primitive::Path(PathPrimitive {
                    points,
                    closed: false,
                    class_name: "grid-x".to_owned(),
                    opacity: 1.0,
                    translate_x: 0.0,
                }),
            ));
        }
    }

    if ctx.config.grid.y.show {
        let (lo, hi) = ctx.scales.y.domain();
        let count = ctx.config.axis.y.tick.count.unwrap_or(10);
        for (slot, value) in nice_ticks(lo, hi, count).into_iter().enumerate() {
            let position = ctx.scales.y.scale(value);
            let points = if rotated {
                vec![
                    Some(Point::new(position, 0.0)),
                    Some(Point::new(position, plot_h)),
                ]
            } else {
                vec![
                    Some(Point::new(0.0, position)),
                    Some(Point::new(plot_w, position)),
                ]
            };
            nodes.push((
                SceneKey::new(Layer::Grid, "y", slot),
                Primitive::Path(PathPrimitive {
                    points,
                    closed: false,
                    class_name: "grid-y".to_owned(),
                    opacity: 1.0,
                    translate_x: 0.0,
                }),
            ));
        }
    }
    nodes
}

fn region_nodes(ctx: RedrawContext<'_>) -> Vec<(SceneKey, Primitive)> {
    let mut nodes = Vec::new();
    let plot_h = ctx.layout.height;
    let plot_w = ctx.layout.width;

    for (slot, region) in ctx.config.regions.iter().enumerate() {
        let rect = match region.axis {
            AxisId::X => {
                let (range_lo, range_hi) = ctx.scales.x.range();
                let start = region
                    .start
                    .map(|v| ctx.scales.x.scale(v))
                    .unwrap_or(range_lo.min(range_hi));
                let end = region
                    .end
                    .map(|v| ctx.scales.x.scale(v))
                    .unwrap_or(range_lo.max(range_hi));
                RectPrimitive {
                    x: start.min(end),
                    y: 0.0,
                    width: (end - start).abs(),
                    height: plot_h,
                    class_name: "region-x".to_owned(),
                    opacity: 1.0,
                }
            }
            AxisId::Y | AxisId::Y2 => {
                let scale = if region.axis == AxisId::Y2 {
                    ctx.scales.y2
                } else {
                    ctx.scales.y
                };
                let (domain_lo, domain_hi) = scale.domain();
                let start = scale.scale(region.start.unwrap_or(domain_lo));
                let end = scale.scale(region.end.unwrap_or(domain_hi));
                RectPrimitive {
                    x: 0.0,
                    y: start.min(end),
                    width: plot_w,
                    height: (end - start).abs(),
                    class_name: "region-y".to_owned(),
                    opacity: 1.0,
                }
            }
        };
        let id = region.label.clone().unwrap_or_else(|| "region".to_owned());
        nodes.push((SceneKey::new(Layer::Region, id, slot), Primitive::Rect(rect)));
    }
    nodes
}

fn label_nodes(ctx: RedrawContext<'_>) -> Vec<(SceneKey, Primitive)> {
    if !ctx.config.data.labels.show {
        return Vec::new();
    }
    let mut nodes = Vec::new();
    for target in ctx.store.visible() {
        if target.kind.is_arc() {
            continue;
        }
        let scales = ctx.scales.shape(target.axis);
        let opacity = target_opacity(ctx.focus, &target.id);
        for value in &target.values {
            let (Some(v), true) = (value.value, value.has_position()) else {
                continue;
            };
            let anchor = scales.project(value.x, v);
            nodes.push((
                SceneKey::new(Layer::Label, target.id.clone(), value.index),
                Primitive::Text(TextPrimitive {
                    x: anchor.x,
                    y: anchor.y - 5.0,
                    lines: vec![format_number(v)],
                    rotate_deg: 0.0,
                    class_name: format!("label-{}", target.id),
                    opacity,
                }),
            ));
        }
    }
    nodes
}

fn build_event_rects(ctx: RedrawContext<'_>) -> Vec<EventRect> {
    // Event rects only serve tooltip pointer queries.
    if !ctx.config.interaction.enabled || !ctx.config.tooltip.show {
        return Vec::new();
    }
    let scales = ctx.scales.shape(AxisBinding::Y);
    match event_rect_mode(ctx.store) {
        EventRectMode::SingleX => {
            single_x_rects(ctx.store, scales, ctx.layout.width, ctx.layout.height)
        }
        EventRectMode::MultipleX => {
            vec![multiple_x_rect(ctx.layout.width, ctx.layout.height)]
        }
    }
}
