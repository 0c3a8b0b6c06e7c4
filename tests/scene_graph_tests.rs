use approx::assert_relative_eq;
use plotline::anim::Easing;
use plotline::render::{Layer, Primitive, RectPrimitive, SceneGraph, SceneKey};

fn rect(x: f64) -> Primitive {
    Primitive::Rect(RectPrimitive {
        x,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        class_name: "bar".to_owned(),
        opacity: 1.0,
    })
}

fn key(id: &str, index: usize) -> SceneKey {
    SceneKey::new(Layer::Bar, id, index)
}

fn rect_x(primitive: &Primitive) -> f64 {
    match primitive {
        Primitive::Rect(rect) => rect.x,
        other => panic!("expected rect, got {other:?}"),
    }
}

#[test]
fn reconcile_partitions_enter_update_exit() {
    let mut scene = SceneGraph::new();

    let stats = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0)), (key("a", 1), rect(20.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    assert_eq!(stats.entered, 2);
    assert_eq!(stats.updated, 0);
    assert_eq!(stats.exited, 0);

    let stats = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(5.0)), (key("b", 0), rect(40.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    assert_eq!(stats.entered, 1);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.exited, 1);
    assert_eq!(scene.len(), 2);
}

#[test]
fn zero_duration_snaps_without_transitions() {
    let mut scene = SceneGraph::new();
    let stats = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(30.0))],
        0,
        0,
        Easing::Linear,
        true,
    );

    assert!(stats.started.is_empty());
    assert_eq!(scene.active_transition_count(), 0);
    let shown = scene.shown(&key("a", 0), 0).unwrap();
    assert_relative_eq!(rect_x(&shown), 30.0);
}

#[test]
fn entering_nodes_fade_in() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        100,
        1_000,
        Easing::Linear,
        true,
    );

    assert_relative_eq!(scene.shown(&key("a", 0), 1_000).unwrap().opacity(), 0.0);
    assert_relative_eq!(scene.shown(&key("a", 0), 1_050).unwrap().opacity(), 0.5);
    assert_relative_eq!(scene.shown(&key("a", 0), 1_100).unwrap().opacity(), 1.0);
}

#[test]
fn fade_enter_off_shows_nodes_immediately() {
    let mut scene = SceneGraph::new();
    let stats = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        100,
        0,
        Easing::Linear,
        false,
    );

    assert!(stats.started.is_empty());
    assert_relative_eq!(scene.shown(&key("a", 0), 0).unwrap().opacity(), 1.0);
}

#[test]
fn updates_interpolate_between_shown_and_target() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(100.0))],
        100,
        0,
        Easing::Linear,
        true,
    );

    let halfway = scene.shown(&key("a", 0), 50).unwrap();
    assert_relative_eq!(rect_x(&halfway), 50.0);
    let done = scene.shown(&key("a", 0), 100).unwrap();
    assert_relative_eq!(rect_x(&done), 100.0);
}

#[test]
fn interrupted_transitions_retarget_from_the_shown_state() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    let first = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(100.0))],
        100,
        0,
        Easing::Linear,
        true,
    );

    // Re-target at the halfway point; the new transition starts at x = 50.
    let second = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        100,
        50,
        Easing::Linear,
        true,
    );
    assert_relative_eq!(rect_x(&scene.shown(&key("a", 0), 50).unwrap()), 50.0);
    assert_relative_eq!(rect_x(&scene.shown(&key("a", 0), 100).unwrap()), 25.0);

    // The interrupted id is reported as ended on the next advance.
    let ended = scene.advance(60);
    assert!(ended.contains(&first.started[0]));
    assert!(!ended.contains(&second.started[0]));
}

#[test]
fn exiting_nodes_fade_out_then_drop() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    let stats = scene.reconcile(Layer::Bar, Vec::new(), 100, 0, Easing::Linear, true);
    assert_eq!(stats.exited, 1);

    // Still present mid-fade; removed once the exit finishes.
    assert_relative_eq!(scene.shown(&key("a", 0), 50).unwrap().opacity(), 0.5);
    let ended = scene.advance(100);
    assert_eq!(ended, stats.started);
    assert!(!scene.contains(&key("a", 0)));
}

#[test]
fn unchanged_nodes_start_no_transition() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    let stats = scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        100,
        0,
        Easing::Linear,
        true,
    );

    assert_eq!(stats.updated, 1);
    assert!(stats.started.is_empty());
}

#[test]
fn reconcile_ignores_other_layers() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    let stats = scene.reconcile(Layer::Line, Vec::new(), 0, 0, Easing::Linear, true);

    assert_eq!(stats.exited, 0);
    assert!(scene.contains(&key("a", 0)));
}

#[test]
fn frame_is_sorted_by_layer_then_index() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 1), rect(0.0)), (key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    scene.reconcile(
        Layer::Grid,
        vec![(SceneKey::new(Layer::Grid, "x", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );

    let frame = scene.frame(0);
    let order: Vec<(Layer, usize)> = frame
        .iter()
        .map(|(key, _)| (key.layer, key.index))
        .collect();
    assert_eq!(
        order,
        vec![(Layer::Grid, 0), (Layer::Bar, 0), (Layer::Bar, 1)]
    );
}

#[test]
fn clear_layer_drops_without_transitions() {
    let mut scene = SceneGraph::new();
    scene.reconcile(
        Layer::Bar,
        vec![(key("a", 0), rect(0.0))],
        0,
        0,
        Easing::Linear,
        true,
    );
    scene.clear_layer(Layer::Bar);
    assert!(scene.is_empty());
}
