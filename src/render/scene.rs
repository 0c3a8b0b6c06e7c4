//! Persistent scene graph with enter/update/exit reconciliation.
//!
//! Nodes are keyed by `(layer, id, index)` so repeated redraws re-target the
//! same node instead of rebuilding the scene. Attribute changes under a
//! non-zero duration become transitions sampled against the cooperative
//! clock; an interrupted transition reports its id as ended so barriers from
//! earlier passes still resolve.

use indexmap::IndexMap;

use crate::anim::{Easing, Transition, TransitionId};
use crate::render::primitives::Primitive;

/// Scene layers in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Grid,
    Region,
    Area,
    Bar,
    Line,
    Arc,
    Axis,
    Label,
    EventRect,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneKey {
    pub layer: Layer,
    pub id: String,
    pub index: usize,
}

impl SceneKey {
    #[must_use]
    pub fn new(layer: Layer, id: impl Into<String>, index: usize) -> Self {
        Self {
            layer,
            id: id.into(),
            index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Active,
    Exiting,
}

#[derive(Debug, Clone)]
struct SceneNode {
    target: Primitive,
    from: Option<Primitive>,
    transition: Option<Transition>,
    phase: Phase,
}

impl SceneNode {
    fn shown(&self, now_ms: u64) -> Primitive {
        match (&self.from, &self.transition) {
            (Some(from), Some(transition)) => {
                Primitive::lerp(from, &self.target, transition.progress(now_ms))
            }
            _ => self.target.clone(),
        }
    }
}

/// Per-reconcile partition counts; the partitions are disjoint and cover
/// every desired key plus every dropped node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
    /// Transitions started by this reconcile, for barrier arming.
    pub started: Vec<TransitionId>,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: IndexMap<SceneKey, SceneNode>,
    next_transition_id: TransitionId,
    /// Ids ended outside `advance` (interruptions), drained with the next
    /// advance so barriers observe them.
    interrupted: Vec<TransitionId>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &SceneKey) -> bool {
        self.nodes.contains_key(key)
    }

    #[must_use]
    pub fn active_transition_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.transition.is_some())
            .count()
    }

    /// Currently shown primitive for a node.
    #[must_use]
    pub fn shown(&self, key: &SceneKey, now_ms: u64) -> Option<Primitive> {
        self.nodes.get(key).map(|node| node.shown(now_ms))
    }

    /// Reconciles one layer against its desired node set.
    ///
    /// `fade_enter` controls whether entering nodes fade from transparent;
    /// the pipeline clears it for targets past their first appearance.
    pub fn reconcile(
        &mut self,
        layer: Layer,
        desired: Vec<(SceneKey, Primitive)>,
        duration_ms: u32,
        now_ms: u64,
        easing: Easing,
        fade_enter: bool,
    ) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let mut seen: Vec<SceneKey> = Vec::with_capacity(desired.len());

        for (key, primitive) in desired {
            debug_assert_eq!(key.layer, layer);
            seen.push(key.clone());
            match self.nodes.get_mut(&key) {
                Some(node) => {
                    stats.updated += 1;
                    let unchanged = node.transition.is_none() && node.target == primitive;
                    if unchanged {
                        node.phase = Phase::Active;
                        continue;
                    }
                    let shown = node.shown(now_ms);
                    if let Some(active) = node.transition.take() {
                        // Interruption ends the previous transition.
                        self.interrupted.push(active.id);
                    }
                    node.phase = Phase::Active;
                    if duration_ms > 0 {
                        // Field access keeps the node borrow disjoint.
                        let id = self.next_transition_id + 1;
                        self.next_transition_id = id;
                        node.from = Some(shown);
                        node.target = primitive;
                        node.transition =
                            Some(Transition::new(id, now_ms, duration_ms, easing));
                        stats.started.push(id);
                    } else {
                        node.from = None;
                        node.target = primitive;
                    }
                }
                None => {
                    stats.entered += 1;
                    let mut node = SceneNode {
                        target: primitive,
                        from: None,
                        transition: None,
                        phase: Phase::Active,
                    };
                    if duration_ms > 0 && fade_enter {
                        let id = self.next_id();
                        node.from = Some(node.target.clone().with_opacity(0.0));
                        node.transition =
                            Some(Transition::new(id, now_ms, duration_ms, easing));
                        stats.started.push(id);
                    }
                    self.nodes.insert(key, node);
                }
            }
        }

        // Exit pass: fade out or drop immediately.
        let stale: Vec<SceneKey> = self
            .nodes
            .iter()
            .filter(|(key, node)| {
                key.layer == layer && node.phase == Phase::Active && !seen.contains(key)
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            stats.exited += 1;
            if duration_ms > 0 {
                let Some(node) = self.nodes.get_mut(&key) else {
                    continue;
                };
                let id = self.next_transition_id + 1;
                self.next_transition_id = id;
                let shown = node.shown(now_ms);
                if let Some(active) = node.transition.take() {
                    self.interrupted.push(active.id);
                }
                node.from = Some(shown.clone());
                node.target = shown.with_opacity(0.0);
                node.transition = Some(Transition::new(id, now_ms, duration_ms, easing));
                node.phase = Phase::Exiting;
                stats.started.push(id);
            } else {
                self.nodes.shift_remove(&key);
            }
        }

        stats
    }

    /// Advances the clock: finishes due transitions, removes completed
    /// exits, and returns every transition id that ended since the last
    /// advance (completions and interruptions alike).
    pub fn advance(&mut self, now_ms: u64) -> Vec<TransitionId> {
        let mut ended = std::mem::take(&mut self.interrupted);
        let mut removals: Vec<SceneKey> = Vec::new();

        for (key, node) in &mut self.nodes {
            let Some(transition) = node.transition else {
                continue;
            };
            if transition.finished(now_ms) {
                ended.push(transition.id);
                node.transition = None;
                node.from = None;
                if node.phase == Phase::Exiting {
                    removals.push(key.clone());
                }
            }
        }
        for key in removals {
            self.nodes.shift_remove(&key);
        }
        ended
    }

    /// Snapshot of every shown primitive in paint order.
    #[must_use]
    pub fn frame(&self, now_ms: u64) -> Vec<(SceneKey, Primitive)> {
        let mut nodes: Vec<(SceneKey, Primitive)> = self
            .nodes
            .iter()
            .map(|(key, node)| (key.clone(), node.shown(now_ms)))
            .collect();
        nodes.sort_by(|(a, _), (b, _)| a.layer.cmp(&b.layer).then(a.index.cmp(&b.index)));
        nodes
    }

    /// Drops every node of a layer without transitions.
    pub fn clear_layer(&mut self, layer: Layer) {
        self.nodes.retain(|key, _| key.layer != layer);
    }

    fn next_id(&mut self) -> TransitionId {
        self.next_transition_id += 1;
        self.next_transition_id
    }
}
