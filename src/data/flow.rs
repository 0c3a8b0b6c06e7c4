//! Streaming "flow" mutation: append a batch, keep all targets equal length,
//! trim an equal-length head window.

use crate::data::target::{Target, TargetStore, Value};
use crate::error::{ChartError, ChartResult};

/// How many trailing points stay visible after the animated shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowCutoff {
    /// Remove exactly this many oldest points from every target.
    Length(usize),
    /// Remove every leading point whose x is strictly below the cutoff.
    To(f64),
}

/// Outcome handed to the redraw pipeline so it can animate the shift and,
/// once the barrier fires, strip the now-offscreen head window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowPlan {
    /// Points appended to every target.
    pub appended: usize,
    /// Head points to strip from every target after the animation.
    pub shifted: usize,
}

/// Applies one flow batch to the store.
///
/// Targets absent from the batch receive `None`-valued placeholders; targets
/// new in the batch receive missing-history placeholders, so every target
/// keeps an identical value count.
pub fn apply_flow(
    store: &mut TargetStore,
    batch: Vec<Target>,
    cutoff: FlowCutoff,
) -> ChartResult<FlowPlan> {
    let appended = batch
        .iter()
        .map(|target| target.values.len())
        .max()
        .unwrap_or(0);
    if appended == 0 {
        return Err(ChartError::InvalidData(
            "flow batch contains no values".to_owned(),
        ));
    }

    let prior_len = store.iter().map(|target| target.values.len()).next().unwrap_or(0);

    let mut incoming: Vec<Target> = batch;

    // Existing targets: append their batch values, or placeholders when the
    // batch skipped them.
    for target in store.iter_mut() {
        let position = incoming
            .iter()
            .position(|candidate| candidate.id == target.id);
        match position {
            Some(found) => {
                let fresh = incoming.swap_remove(found);
                append_values(target, fresh.values, appended);
            }
            None => append_values(target, Vec::new(), appended),
        }
    }

    // Brand-new targets: backfill missing history so lengths stay equal.
    for mut fresh in incoming {
        let mut values = placeholder_run(&fresh.values, prior_len);
        values.extend(fresh.values.drain(..));
        pad_tail(&mut values, prior_len + appended);
        reindex(&mut values);
        fresh.values = values;
        store.insert(fresh);
    }

    let shifted = match cutoff {
        FlowCutoff::Length(length) => length.min(prior_len + appended),
        FlowCutoff::To(to) => store
            .iter()
            .next()
            .map(|target| {
                target
                    .values
                    .iter()
                    .take_while(|value| value.has_position() && value.x < to)
                    .count()
            })
            .unwrap_or(0),
    };

    Ok(FlowPlan { appended, shifted })
}

/// Strips the head window scheduled by `apply_flow`, once the transition
/// barrier has fired and the leading elements are offscreen.
pub fn strip_flow_head(store: &mut TargetStore, plan: FlowPlan) {
    if plan.shifted == 0 {
        return;
    }
    for target in store.iter_mut() {
        let take = plan.shifted.min(target.values.len());
        target.values.drain(..take);
        reindex(&mut target.values);
    }
}

fn append_values(target: &mut Target, mut fresh: Vec<Value>, appended: usize) {
    let final_len = target.values.len() + appended;
    if fresh.is_empty() {
        fresh = synthesize_continuation(&target.values, appended);
    }
    target.values.extend(fresh);
    pad_tail(&mut target.values, final_len);
    reindex(&mut target.values);
}

/// `None`-valued placeholders continuing the target's x cadence.
fn synthesize_continuation(existing: &[Value], count: usize) -> Vec<Value> {
    let step = x_step(existing);
    let last_x = existing
        .iter()
        .rev()
        .find(|value| value.has_position())
        .map_or(0.0, |value| value.x);
    (1..=count)
        .map(|offset| Value::new(last_x + step * offset as f64, None, 0))
        .collect()
}

/// Missing-history placeholders preceding a brand-new target's first value.
fn placeholder_run(incoming: &[Value], count: usize) -> Vec<Value> {
    let step = x_step(incoming);
    let first_x = incoming
        .iter()
        .find(|value| value.has_position())
        .map_or(0.0, |value| value.x);
    (0..count)
        .map(|index| {
            let back = (count - index) as f64;
            Value::new(first_x - step * back, None, 0)
        })
        .collect()
}

fn pad_tail(values: &mut Vec<Value>, target_len: usize) {
    while values.len() < target_len {
        let filler = synthesize_continuation(values, 1);
        values.extend(filler);
    }
}

fn x_step(values: &[Value]) -> f64 {
    let positioned: Vec<f64> = values
        .iter()
        .filter(|value| value.has_position())
        .map(|value| value.x)
        .collect();
    if positioned.len() < 2 {
        return 1.0;
    }
    let span = positioned[positioned.len() - 1] - positioned[0];
    let step = span / (positioned.len() - 1) as f64;
    if step.is_finite() && step > 0.0 { step } else { 1.0 }
}

fn reindex(values: &mut [Value]) {
    for (index, value) in values.iter_mut().enumerate() {
        value.index = index;
    }
}
