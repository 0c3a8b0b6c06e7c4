use plotline::data::{FlowCutoff, FlowPlan, ShapeKind, Target, TargetStore, Value, apply_flow, strip_flow_head};
use plotline::error::ChartError;

fn target(id: &str, start_x: f64, values: &[f64]) -> Target {
    let values = values
        .iter()
        .enumerate()
        .map(|(index, v)| Value::new(start_x + index as f64, Some(*v), index))
        .collect();
    Target::new(id, ShapeKind::Line, values)
}

fn store_of(targets: Vec<Target>) -> TargetStore {
    let mut store = TargetStore::new();
    for t in targets {
        store.insert(t);
    }
    store
}

fn xs(store: &TargetStore, id: &str) -> Vec<f64> {
    store.get(id).map(|t| t.values.iter().map(|v| v.x).collect()).unwrap_or_default()
}

fn values_of(store: &TargetStore, id: &str) -> Vec<Option<f64>> {
    store
        .get(id)
        .map(|t| t.values.iter().map(|v| v.value).collect())
        .unwrap_or_default()
}

#[test]
fn flow_appends_and_schedules_an_equal_shift() {
    let mut store = store_of(vec![target("a", 0.0, &[1.0, 2.0, 3.0])]);

    let plan = apply_flow(
        &mut store,
        vec![target("a", 3.0, &[4.0, 5.0])],
        FlowCutoff::Length(2),
    )
    .unwrap();

    assert_eq!(plan, FlowPlan { appended: 2, shifted: 2 });
    assert_eq!(xs(&store, "a"), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn absent_targets_get_placeholder_continuations() {
    let mut store = store_of(vec![
        target("a", 0.0, &[1.0, 2.0]),
        target("b", 0.0, &[9.0, 8.0]),
    ]);

    apply_flow(
        &mut store,
        vec![target("a", 2.0, &[3.0])],
        FlowCutoff::Length(0),
    )
    .unwrap();

    // "b" keeps pace with a gap value continuing its x cadence.
    assert_eq!(values_of(&store, "b"), vec![Some(9.0), Some(8.0), None]);
    assert_eq!(xs(&store, "b"), vec![0.0, 1.0, 2.0]);
}

#[test]
fn new_targets_backfill_missing_history() {
    let mut store = store_of(vec![target("a", 0.0, &[1.0, 2.0, 3.0])]);

    apply_flow(
        &mut store,
        vec![target("fresh", 3.0, &[7.0])],
        FlowCutoff::Length(0),
    )
    .unwrap();

    let fresh = store.get("fresh").unwrap();
    assert_eq!(fresh.values.len(), 4);
    assert_eq!(values_of(&store, "fresh"), vec![None, None, None, Some(7.0)]);
    // Re-indexed densely despite the synthetic head.
    let indices: Vec<usize> = fresh.values.iter().map(|v| v.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn cutoff_to_counts_leading_points_below_x() {
    let mut store = store_of(vec![target("a", 0.0, &[1.0, 2.0, 3.0])]);

    let plan = apply_flow(
        &mut store,
        vec![target("a", 3.0, &[4.0])],
        FlowCutoff::To(2.0),
    )
    .unwrap();

    // x values 0 and 1 fall below the cutoff.
    assert_eq!(plan.shifted, 2);
}

#[test]
fn cutoff_length_is_clamped_to_the_store() {
    let mut store = store_of(vec![target("a", 0.0, &[1.0])]);

    let plan = apply_flow(
        &mut store,
        vec![target("a", 1.0, &[2.0])],
        FlowCutoff::Length(99),
    )
    .unwrap();

    assert_eq!(plan.shifted, 2);
}

#[test]
fn strip_flow_head_trims_and_reindexes() {
    let mut store = store_of(vec![
        target("a", 0.0, &[1.0, 2.0, 3.0, 4.0]),
        target("b", 0.0, &[5.0, 6.0, 7.0, 8.0]),
    ]);

    strip_flow_head(&mut store, FlowPlan { appended: 0, shifted: 2 });

    assert_eq!(xs(&store, "a"), vec![2.0, 3.0]);
    assert_eq!(values_of(&store, "b"), vec![Some(7.0), Some(8.0)]);
    let indices: Vec<usize> = store.get("a").unwrap().values.iter().map(|v| v.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn zero_shift_is_a_no_op() {
    let mut store = store_of(vec![target("a", 0.0, &[1.0, 2.0])]);
    strip_flow_head(&mut store, FlowPlan::default());
    assert_eq!(xs(&store, "a"), vec![0.0, 1.0]);
}

#[test]
fn empty_batches_are_rejected() {
    let mut store = store_of(vec![target("a", 0.0, &[1.0])]);
    let result = apply_flow(&mut store, Vec::new(), FlowCutoff::Length(1));
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn ragged_batches_pad_the_shorter_target() {
    let mut store = store_of(vec![
        target("a", 0.0, &[1.0, 2.0]),
        target("b", 0.0, &[9.0, 8.0]),
    ]);

    let plan = apply_flow(
        &mut store,
        vec![target("a", 2.0, &[3.0, 4.0]), target("b", 2.0, &[7.0])],
        FlowCutoff::Length(0),
    )
    .unwrap();

    assert_eq!(plan.appended, 2);
    assert_eq!(store.get("a").unwrap().values.len(), 4);
    assert_eq!(store.get("b").unwrap().values.len(), 4);
    assert_eq!(values_of(&store, "b"), vec![Some(9.0), Some(8.0), Some(7.0), None]);
}
