//! The public chart handle.
//!
//! A chart is generated detached, attaches to a host surface once the host
//! knows its size, and from then on is driven by a cooperative millisecond
//! clock: the host calls [`Chart::tick`] and every transition, barrier and
//! queued resize event is serviced from that call. Destruction is explicit
//! and idempotent; any operation after [`Chart::destroy`] reports
//! [`ChartError::Destroyed`].

use tracing::{debug, info};

use crate::anim::Barrier;
use crate::axis::TickLayout;
use crate::config::{ChartCallbacks, ChartConfig, DataConfig, XAxisKind};
use crate::data::{
    FlowCutoff, FlowPlan, IngestCache, Target, TargetStore, apply_flow, ingest,
    strip_flow_head,
};
use crate::error::{ChartError, ChartResult};
use crate::interact::{EventRect, Hit, hit_test};
use crate::pipeline::{
    ChartId, PlotLayout, RedrawContext, RedrawOptions, RedrawScales, build_scales, resize,
    run_redraw,
};
use crate::render::{Renderer, SceneFrame, SceneGraph, Viewport};
use crate::shape::{BarRect, Point};

/// Mount progression: a chart renders nothing until the host attaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mount {
    Pending,
    Ready,
}

/// Work deferred until a pass's transition barrier fires.
#[derive(Debug, Clone, Copy)]
enum Finalize {
    Render,
    Flow(FlowPlan),
}

#[derive(Debug)]
struct PendingBarrier {
    barrier: Barrier,
    finalize: Finalize,
}

/// One live chart.
pub struct Chart {
    id: ChartId,
    config: ChartConfig,
    callbacks: ChartCallbacks,
    store: TargetStore,
    categories: Vec<String>,
    scene: SceneGraph,
    mount: Mount,
    viewport: Option<Viewport>,
    zoom_window: Option<[f64; 2]>,
    focused: Option<Vec<String>>,
    barriers: Vec<PendingBarrier>,
    backgrounded: bool,
    clock_ms: u64,
    last_ticks: Option<TickLayout>,
    last_scales: Option<RedrawScales>,
    bars: Vec<(String, Vec<BarRect>)>,
    event_rects: Vec<EventRect>,
    unload_cache: IngestCache,
    destroyed: bool,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Chart")
            .field("id", &self.id)
            .field("targets", &self.store.len())
            .field("mount", &self.mount)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Chart {
    /// Builds a detached chart from a validated config, ingesting the
    /// configured data source.
    pub fn generate(config: ChartConfig, callbacks: ChartCallbacks) -> ChartResult<Self> {
        config.validate()?;

        let output = ingest(&config.data, config.axis.x.kind)?;
        let mut store = TargetStore::new();
        for mut target in output.targets {
            target.legend_hidden = config.legend.hide.iter().any(|id| id == &target.id);
            store.insert(target);
        }

        // An explicit category list beats labels scraped from the x column.
        let categories = if config.axis.x.categories.is_empty() {
            output.categories
        } else {
            config.axis.x.categories.clone()
        };

        let id = resize::register();
        info!(chart = id, targets = store.len(), "chart generated");

        Ok(Self {
            id,
            config,
            callbacks,
            store,
            categories,
            scene: SceneGraph::new(),
            mount: Mount::Pending,
            viewport: None,
            zoom_window: None,
            focused: None,
            barriers: Vec::new(),
            backgrounded: false,
            clock_ms: 0,
            last_ticks: None,
            last_scales: None,
            bars: Vec::new(),
            event_rects: Vec::new(),
            unload_cache: IngestCache::with_capacity(16),
            destroyed: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The host surface is ready: run the first paint.
    ///
    /// The initial pass never animates; `on_init` fires just before it.
    pub fn notify_attached(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.alive()?;
        let viewport = self.configured_viewport(viewport);
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.viewport = Some(viewport);
        self.mount = Mount::Ready;
        if let Some(on_init) = self.callbacks.on_init.as_mut() {
            on_init();
        }
        self.redraw(RedrawOptions::resize())
    }

    /// Loads additional data, replacing targets that share an id.
    pub fn load(&mut self, data: DataConfig) -> ChartResult<()> {
        self.alive()?;
        let output = ingest(&data, self.config.axis.x.kind)?;
        for category in output.categories {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
        for target in output.targets {
            self.store.upsert(target);
        }
        self.redraw_if_ready(RedrawOptions::load(self.duration()))
    }

    /// Removes targets; an empty id list removes everything. Removed values
    /// stay in a bounded cache for [`Chart::reload`].
    pub fn unload(&mut self, ids: &[String]) -> ChartResult<()> {
        self.alive()?;
        // Validate before touching the store: an unknown id must leave the
        // target set untouched.
        self.known(ids)?;
        let doomed: Vec<String> = if ids.is_empty() {
            self.store.iter().map(|target| target.id.clone()).collect()
        } else {
            ids.to_vec()
        };
        for id in &doomed {
            if let Some(target) = self.store.remove(id) {
                self.unload_cache.insert(id.clone(), target.values);
            }
        }
        self.redraw_if_ready(RedrawOptions::load(self.duration()))
    }

    /// Restores previously unloaded targets from the cache.
    pub fn reload(&mut self, ids: &[String]) -> ChartResult<()> {
        self.alive()?;
        for id in ids {
            if !self.unload_cache.contains(id) {
                return Err(ChartError::UnknownTarget(id.clone()));
            }
        }
        for id in ids {
            let Some(values) = self.unload_cache.get(id) else {
                continue;
            };
            let mut target = Target::new(id.clone(), self.config.data.kind_for(id), values);
            target.axis = self.config.data.axis_for(id);
            self.store.upsert(target);
        }
        self.redraw_if_ready(RedrawOptions::load(self.duration()))
    }

    /// Makes hidden targets visible again; empty list shows everything.
    pub fn show(&mut self, ids: &[String]) -> ChartResult<()> {
        self.set_hidden(ids, false)
    }

    /// Hides targets from every shape and domain computation; empty list
    /// hides everything.
    pub fn hide(&mut self, ids: &[String]) -> ChartResult<()> {
        self.set_hidden(ids, true)
    }

    /// Dims every target outside `ids`.
    pub fn focus(&mut self, ids: &[String]) -> ChartResult<()> {
        self.alive()?;
        self.known(ids)?;
        self.focused = Some(ids.to_vec());
        self.redraw_if_ready(RedrawOptions::zoom(self.duration()))
    }

    /// Dims the listed targets, leaving the rest at full opacity.
    pub fn defocus(&mut self, ids: &[String]) -> ChartResult<()> {
        self.alive()?;
        self.known(ids)?;
        let kept: Vec<String> = self
            .store
            .iter()
            .map(|target| target.id.clone())
            .filter(|id| !ids.contains(id))
            .collect();
        self.focused = Some(kept);
        self.redraw_if_ready(RedrawOptions::zoom(self.duration()))
    }

    /// Restores the listed targets to full opacity; an empty list clears
    /// all focus dimming.
    pub fn revert(&mut self, ids: &[String]) -> ChartResult<()> {
        self.alive()?;
        self.known(ids)?;
        if ids.is_empty() {
            self.focused = None;
        } else if let Some(focused) = self.focused.as_mut() {
            for id in ids {
                if !focused.contains(id) {
                    focused.push(id.clone());
                }
            }
            // Nothing left dimmed: drop the focus state entirely.
            if focused.len() == self.store.len() {
                self.focused = None;
            }
        }
        self.redraw_if_ready(RedrawOptions::zoom(self.duration()))
    }

    /// Appends a streaming batch and animates the window shift.
    ///
    /// `to` removes every leading point below the cutoff x; otherwise
    /// `length` removes that many oldest points; with neither, the window
    /// slides by exactly the appended count. When both are given, `to` wins.
    pub fn flow(
        &mut self,
        data: DataConfig,
        length: Option<usize>,
        to: Option<f64>,
    ) -> ChartResult<()> {
        self.alive()?;
        let mut output = ingest(&data, self.config.axis.x.kind)?;

        // Indexed batches restart at x = 0; shift them to continue the
        // existing index sequence.
        if self.config.axis.x.kind == XAxisKind::Indexed && data.x.is_none() && data.xs.is_empty() {
            let offset = self
                .store
                .iter()
                .map(|target| target.values.len())
                .max()
                .unwrap_or(0) as f64;
            for target in &mut output.targets {
                for value in &mut target.values {
                    value.x += offset;
                }
            }
        }

        let appended = output
            .targets
            .iter()
            .map(|target| target.values.len())
            .max()
            .unwrap_or(0);
        let cutoff = match (to, length) {
            (Some(to), _) => FlowCutoff::To(to),
            (None, Some(length)) => FlowCutoff::Length(length),
            (None, None) => FlowCutoff::Length(appended),
        };
        let plan = apply_flow(&mut self.store, output.targets, cutoff)?;
        debug!(chart = self.id, appended = plan.appended, shifted = plan.shifted, "flow applied");
        if self.mount != Mount::Ready {
            // No surface means no shift animation; the head window is
            // already offscreen, so strip it now instead of never.
            strip_flow_head(&mut self.store, plan);
            return Ok(());
        }
        self.redraw(RedrawOptions::flow(plan, self.duration()))
    }

    /// Narrows the live x window; the canonical domain is untouched. Returns
    /// the clamped window actually applied.
    pub fn zoom(&mut self, window: [f64; 2]) -> ChartResult<[f64; 2]> {
        self.alive()?;
        if !self.config.zoom.enabled {
            return Err(ChartError::InvalidConfig(
                "zoom is disabled in the config".to_owned(),
            ));
        }
        if self.config.axis.x.kind == XAxisKind::Category {
            return Err(ChartError::InvalidConfig(
                "zoom is not supported on category axes".to_owned(),
            ));
        }
        let [lo, hi] = crate::scale::x_domain(&self.store, &self.config);
        let clamped =
            crate::interact::clamp_zoom_window((lo, hi), window, self.config.zoom.min_window)?;
        self.zoom_window = Some(clamped);
        self.redraw_if_ready(RedrawOptions::zoom(self.duration()))?;
        Ok(clamped)
    }

    /// The active zoom window, if any.
    #[must_use]
    pub fn zoom_domain(&self) -> Option<[f64; 2]> {
        self.zoom_window
    }

    /// Restores the full x domain.
    pub fn unzoom(&mut self) -> ChartResult<()> {
        self.alive()?;
        self.zoom_window = None;
        self.redraw_if_ready(RedrawOptions::zoom(self.duration()))
    }

    /// Applies a new viewport immediately, without a transition.
    pub fn resize(&mut self, width: u32, height: u32) -> ChartResult<()> {
        self.alive()?;
        if self.mount != Mount::Ready {
            return Err(ChartError::InvalidConfig(
                "chart is not attached to a surface".to_owned(),
            ));
        }
        let viewport = self.configured_viewport(Viewport::new(width, height));
        if let Some(on_resize) = self.callbacks.on_resize.as_mut() {
            on_resize(viewport.width, viewport.height);
        }
        self.viewport = Some(viewport);
        self.redraw(RedrawOptions::resize())?;
        if let Some(on_resized) = self.callbacks.on_resized.as_mut() {
            on_resized(viewport.width, viewport.height);
        }
        Ok(())
    }

    /// Explicit `size` config dimensions win over host-reported ones.
    fn configured_viewport(&self, reported: Viewport) -> Viewport {
        Viewport {
            width: self.config.size.width.unwrap_or(reported.width),
            height: self.config.size.height.unwrap_or(reported.height),
        }
    }

    /// Completes every running transition and fires due barriers now.
    pub fn flush(&mut self) -> ChartResult<()> {
        self.alive()?;
        let ended = self.scene.advance(u64::MAX);
        self.settle_barriers(&ended, u64::MAX)
    }

    /// Advances the cooperative clock.
    ///
    /// Queued resize broadcasts are coalesced and applied first, then
    /// transitions advance and any barrier whose scope has fully ended runs
    /// its deferred work (`on_rendered`, flow head stripping).
    pub fn tick(&mut self, now_ms: u64) -> ChartResult<()> {
        self.alive()?;
        self.clock_ms = self.clock_ms.max(now_ms);

        if self.mount == Mount::Ready
            && let Some((width, height)) = resize::take_events(self.id).into_iter().last()
        {
            self.resize(width, height)?;
        }

        let ended = self.scene.advance(self.clock_ms);
        self.settle_barriers(&ended, self.clock_ms)
    }

    /// Marks the host surface hidden; hidden charts redraw without
    /// transitions so nothing animates while unobserved.
    pub fn set_visibility(&mut self, visible: bool) {
        self.backgrounded = !visible;
    }

    /// Releases the resize registration and drops every pending barrier.
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        resize::deregister(self.id);
        self.barriers.clear();
        self.callbacks = ChartCallbacks::default();
        info!(chart = self.id, "chart destroyed");
    }

    /// Resolves the pointer against the last drawn geometry.
    #[must_use]
    pub fn hit(&self, pointer: Point) -> Option<Hit> {
        let scales = self.last_scales?;
        hit_test(
            &self.store,
            scales.shape(crate::data::AxisBinding::Y),
            scales.shape(crate::data::AxisBinding::Y2),
            &self.bars,
            pointer,
            self.config.interaction.sensitivity,
        )
    }

    /// Tick layout of the last pass.
    #[must_use]
    pub fn x_ticks(&self) -> Option<&TickLayout> {
        self.last_ticks.as_ref()
    }

    /// Pointer capture rects of the last pass.
    #[must_use]
    pub fn event_rects(&self) -> &[EventRect] {
        &self.event_rects
    }

    #[must_use]
    pub fn target_ids(&self) -> Vec<String> {
        self.store.iter().map(|target| target.id.clone()).collect()
    }

    #[must_use]
    pub fn target(&self, id: &str) -> Option<&Target> {
        self.store.get(id)
    }

    /// Targets currently held at full opacity by a focus, if any.
    #[must_use]
    pub fn focused_ids(&self) -> Option<&[String]> {
        self.focused.as_deref()
    }

    /// Display name for a target: `data.names` entry, else the id itself.
    pub fn target_name(&self, id: &str) -> ChartResult<String> {
        if self.store.get(id).is_none() {
            return Err(ChartError::UnknownTarget(id.to_owned()));
        }
        Ok(self
            .config
            .data
            .names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_owned()))
    }

    /// Display color for a target: `data.colors` entry, else the pattern
    /// cycled by store position.
    pub fn target_color(&self, id: &str) -> ChartResult<String> {
        let Some(position) = self.store.position(id) else {
            return Err(ChartError::UnknownTarget(id.to_owned()));
        };
        Ok(self.config.color_for(id, position))
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Snapshot of the scene at the current clock.
    pub fn frame(&self) -> ChartResult<SceneFrame> {
        self.alive()?;
        let Some(viewport) = self.viewport else {
            return Err(ChartError::InvalidConfig(
                "chart is not attached to a surface".to_owned(),
            ));
        };
        Ok(SceneFrame::new(viewport, self.scene.frame(self.clock_ms)))
    }

    /// Renders the current frame through a backend.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> ChartResult<()> {
        let frame = self.frame()?;
        renderer.render(&frame)
    }

    fn alive(&self) -> ChartResult<()> {
        if self.destroyed {
            return Err(ChartError::Destroyed);
        }
        Ok(())
    }

    fn known(&self, ids: &[String]) -> ChartResult<()> {
        for id in ids {
            if self.store.get(id).is_none() {
                return Err(ChartError::UnknownTarget(id.clone()));
            }
        }
        Ok(())
    }

    fn set_hidden(&mut self, ids: &[String], hidden: bool) -> ChartResult<()> {
        self.alive()?;
        self.known(ids)?;
        for target in self.store.iter_mut() {
            if ids.is_empty() || ids.contains(&target.id) {
                target.hidden = hidden;
            }
        }
        self.redraw_if_ready(RedrawOptions::load(self.duration()))
    }

    fn duration(&self) -> u32 {
        if self.backgrounded {
            0
        } else {
            self.config.transition.duration_ms
        }
    }

    fn redraw_if_ready(&mut self, options: RedrawOptions) -> ChartResult<()> {
        if self.mount == Mount::Ready {
            self.redraw(options)
        } else {
            Ok(())
        }
    }

    fn redraw(&mut self, options: RedrawOptions) -> ChartResult<()> {
        let Some(viewport) = self.viewport else {
            return Err(ChartError::InvalidViewport {
                width: 0,
                height: 0,
            });
        };
        let layout = PlotLayout::compute(viewport, &self.config)?;
        let scales = build_scales(
            &self.store,
            &self.config,
            &self.categories,
            &layout,
            self.zoom_window,
        )?;
        let ctx = RedrawContext {
            store: &self.store,
            config: &self.config,
            categories: &self.categories,
            layout: &layout,
            scales: &scales,
            focus: self.focused.as_deref(),
            now_ms: self.clock_ms,
        };
        let output = run_redraw(&mut self.scene, ctx, options)?;

        self.last_ticks = Some(output.x_ticks);
        self.last_scales = Some(scales);
        self.bars = output.bars;
        self.event_rects = output.event_rects;
        self.barriers.push(PendingBarrier {
            barrier: output.barrier,
            finalize: match options.flow {
                Some(plan) => Finalize::Flow(plan),
                None => Finalize::Render,
            },
        });
        Ok(())
    }

    fn settle_barriers(&mut self, ended: &[crate::anim::TransitionId], now_ms: u64) -> ChartResult<()> {
        let mut fired: Vec<Finalize> = Vec::new();
        for pending in &mut self.barriers {
            pending.barrier.note_ended(ended);
            if pending.barrier.poll(now_ms) {
                fired.push(pending.finalize);
            }
        }
        self.barriers.retain(|pending| !pending.barrier.is_fired());

        for finalize in fired {
            if let Finalize::Flow(plan) = finalize {
                // The shifted head is offscreen now; drop it for real and
                // snap the scene to the trimmed data.
                strip_flow_head(&mut self.store, plan);
                self.redraw(RedrawOptions::resize())?;
            }
            if let Some(on_rendered) = self.callbacks.on_rendered.as_mut() {
                on_rendered();
            }
        }
        Ok(())
    }
}

impl Drop for Chart {
    fn drop(&mut self) {
        self.destroy();
    }
}
