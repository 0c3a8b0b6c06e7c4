//! Process-wide resize fan-out.
//!
//! The host observes container size changes and calls [`broadcast`]; each
//! registered chart drains its own event queue from `Chart::tick`, so no
//! callback ever runs on a destroyed chart. The registry is an explicit
//! singleton: broadcasts are dropped unless [`init`] has run, and
//! [`teardown`] clears every queue for test isolation.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock, PoisonError};

use indexmap::IndexMap;

/// Process-unique chart identity, also used for scene logging.
pub type ChartId = u64;

#[derive(Debug, Default)]
struct RegistryInner {
    enabled: bool,
    next_id: ChartId,
    queues: IndexMap<ChartId, VecDeque<(u32, u32)>>,
}

static REGISTRY: OnceLock<Mutex<RegistryInner>> = OnceLock::new();

fn inner() -> std::sync::MutexGuard<'static, RegistryInner> {
    REGISTRY
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Enables resize fan-out. Idempotent.
pub fn init() {
    inner().enabled = true;
}

/// Disables fan-out and drops every queued event. Registered ids survive so
/// charts can still deregister cleanly.
pub fn teardown() {
    let mut registry = inner();
    registry.enabled = false;
    for queue in registry.queues.values_mut() {
        queue.clear();
    }
}

/// Registers a chart and returns its process-unique id.
pub fn register() -> ChartId {
    let mut registry = inner();
    registry.next_id += 1;
    let id = registry.next_id;
    registry.queues.insert(id, VecDeque::new());
    id
}

/// Removes a chart's queue; pending events for it are dropped.
pub fn deregister(id: ChartId) {
    inner().queues.shift_remove(&id);
}

#[must_use]
pub fn is_registered(id: ChartId) -> bool {
    inner().queues.contains_key(&id)
}

/// Queues one container size change for every registered chart.
pub fn broadcast(width: u32, height: u32) {
    let mut registry = inner();
    if !registry.enabled {
        return;
    }
    for queue in registry.queues.values_mut() {
        queue.push_back((width, height));
    }
}

/// Drains the pending size changes for one chart, oldest first.
pub fn take_events(id: ChartId) -> Vec<(u32, u32)> {
    inner()
        .queues
        .get_mut(&id)
        .map(|queue| queue.drain(..).collect())
        .unwrap_or_default()
}
