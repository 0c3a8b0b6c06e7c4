use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;

use plotline::config::{ChartCallbacks, ChartConfig, DataConfig};
use plotline::data::ShapeKind;
use plotline::error::{ChartError, ChartResult};
use plotline::render::{NullRenderer, Viewport};
use plotline::shape::Point;
use plotline::Chart;

fn columns(specs: &[(&str, &[f64])]) -> DataConfig {
    let columns = specs
        .iter()
        .map(|(id, values)| {
            let mut column = vec![json!(id)];
            column.extend(values.iter().map(|v| json!(v)));
            column
        })
        .collect();
    DataConfig {
        columns: Some(columns),
        ..DataConfig::default()
    }
}

fn config_with(data: DataConfig) -> ChartConfig {
    ChartConfig {
        data,
        ..ChartConfig::default()
    }
}

fn attached(config: ChartConfig) -> ChartResult<Chart> {
    let mut chart = Chart::generate(config, ChartCallbacks::default())?;
    chart.notify_attached(Viewport::new(640, 480))?;
    Ok(chart)
}

#[test]
fn generate_requires_a_data_source() {
    let result = Chart::generate(ChartConfig::default(), ChartCallbacks::default());
    assert!(matches!(result, Err(ChartError::NoDataSource)));
}

#[test]
fn generate_is_detached_until_the_surface_attaches() -> ChartResult<()> {
    let mut chart = Chart::generate(
        config_with(columns(&[("a", &[1.0, 2.0])])),
        ChartCallbacks::default(),
    )?;

    // No viewport yet: frames and resizes are rejected.
    assert!(chart.frame().is_err());
    assert!(chart.resize(800, 600).is_err());

    chart.notify_attached(Viewport::new(640, 480))?;
    assert!(!chart.frame()?.nodes.is_empty());
    Ok(())
}

#[test]
fn attach_rejects_empty_viewports() -> ChartResult<()> {
    let mut chart = Chart::generate(
        config_with(columns(&[("a", &[1.0])])),
        ChartCallbacks::default(),
    )?;
    let result = chart.notify_attached(Viewport::new(640, 0));
    assert!(matches!(result, Err(ChartError::InvalidViewport { .. })));
    Ok(())
}

#[test]
fn init_and_rendered_callbacks_fire_in_order() -> ChartResult<()> {
    let inits = Rc::new(Cell::new(0u32));
    let renders = Rc::new(Cell::new(0u32));
    let callbacks = ChartCallbacks {
        on_init: Some(Box::new({
            let inits = Rc::clone(&inits);
            move || inits.set(inits.get() + 1)
        })),
        on_rendered: Some(Box::new({
            let renders = Rc::clone(&renders);
            move || renders.set(renders.get() + 1)
        })),
        ..ChartCallbacks::default()
    };

    let mut chart = Chart::generate(config_with(columns(&[("a", &[1.0, 2.0])])), callbacks)?;
    assert_eq!(inits.get(), 0);

    chart.notify_attached(Viewport::new(640, 480))?;
    assert_eq!(inits.get(), 1);
    // The first paint snaps; its barrier fires on the next clock advance.
    assert_eq!(renders.get(), 0);
    chart.tick(1)?;
    assert_eq!(renders.get(), 1);
    Ok(())
}

#[test]
fn load_upserts_and_extends_the_target_set() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0, 2.0])])))?;
    assert_eq!(chart.target_ids(), vec!["a".to_owned()]);

    chart.load(columns(&[("b", &[5.0, 6.0])]))?;
    assert_eq!(chart.target_ids(), vec!["a".to_owned(), "b".to_owned()]);

    // Reloading an id replaces its values.
    chart.load(columns(&[("a", &[9.0])]))?;
    let a = chart.target("a").unwrap();
    assert_eq!(a.values.len(), 1);
    assert_eq!(a.values[0].value, Some(9.0));
    Ok(())
}

#[test]
fn hide_and_show_toggle_targets() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0]), ("b", &[2.0])])))?;

    chart.hide(&["a".to_owned()])?;
    assert!(chart.target("a").unwrap().hidden);
    assert!(!chart.target("b").unwrap().hidden);

    // An empty list addresses every target.
    chart.hide(&[])?;
    assert!(chart.target("b").unwrap().hidden);
    chart.show(&[])?;
    assert!(!chart.target("a").unwrap().hidden);

    let missing = chart.hide(&["nope".to_owned()]);
    assert!(matches!(missing, Err(ChartError::UnknownTarget(_))));
    Ok(())
}

#[test]
fn unload_then_reload_round_trips_values() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0, 2.0]), ("b", &[3.0])])))?;

    chart.unload(&["a".to_owned()])?;
    assert_eq!(chart.target_ids(), vec!["b".to_owned()]);

    chart.reload(&["a".to_owned()])?;
    let a = chart.target("a").unwrap();
    assert_eq!(a.values.len(), 2);
    assert_eq!(a.values[1].value, Some(2.0));

    let missing = chart.unload(&["nope".to_owned()]);
    assert!(matches!(missing, Err(ChartError::UnknownTarget(_))));
    Ok(())
}

#[test]
fn unload_with_an_unknown_id_leaves_the_store_untouched() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0]), ("b", &[2.0])])))?;

    let mixed = chart.unload(&["a".to_owned(), "nope".to_owned()]);
    assert!(matches!(mixed, Err(ChartError::UnknownTarget(_))));
    // "a" preceded the bad id but must survive the rejected call.
    assert_eq!(chart.target_ids(), vec!["a".to_owned(), "b".to_owned()]);
    Ok(())
}

#[test]
fn unload_with_no_ids_clears_everything() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0]), ("b", &[2.0])])))?;
    chart.unload(&[])?;
    assert!(chart.target_ids().is_empty());
    Ok(())
}

#[test]
fn zoom_is_gated_by_config_and_returns_the_clamped_window() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0, 2.0, 3.0, 4.0])])))?;
    let denied = chart.zoom([1.0, 2.0]);
    assert!(matches!(denied, Err(ChartError::InvalidConfig(_))));

    let mut config = config_with(columns(&[("a", &[1.0, 2.0, 3.0, 4.0])]));
    config.zoom.enabled = true;
    let mut chart = attached(config)?;

    let window = chart.zoom([1.0, 2.0])?;
    assert_eq!(window, [1.0, 2.0]);
    assert_eq!(chart.zoom_domain(), Some([1.0, 2.0]));

    // Out-of-domain requests come back clamped.
    let window = chart.zoom([-100.0, 100.0])?;
    assert!(window[0] >= -1.0);
    assert!(window[1] <= 4.1);

    chart.unzoom()?;
    assert_eq!(chart.zoom_domain(), None);
    Ok(())
}

#[test]
fn flow_slides_the_window_after_the_transition_settles() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0, 2.0, 3.0])])))?;

    chart.flow(columns(&[("a", &[4.0])]), None, None)?;
    // The head is still present while the shift animates.
    assert_eq!(chart.target("a").unwrap().values.len(), 4);

    chart.flush()?;
    let a = chart.target("a").unwrap();
    let values: Vec<Option<f64>> = a.values.iter().map(|v| v.value).collect();
    assert_eq!(values, vec![Some(2.0), Some(3.0), Some(4.0)]);
    // Indexed x keeps climbing rather than restarting at zero.
    let xs: Vec<f64> = a.values.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn flow_before_attachment_still_slides_the_window() -> ChartResult<()> {
    let mut chart = Chart::generate(
        config_with(columns(&[("a", &[1.0, 2.0, 3.0])])),
        ChartCallbacks::default(),
    )?;

    // Detached charts cannot animate, so the head strips immediately.
    chart.flow(columns(&[("a", &[4.0, 5.0])]), None, None)?;
    let a = chart.target("a").unwrap();
    let values: Vec<Option<f64>> = a.values.iter().map(|v| v.value).collect();
    assert_eq!(values, vec![Some(3.0), Some(4.0), Some(5.0)]);
    let xs: Vec<f64> = a.values.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![2.0, 3.0, 4.0]);

    // Attaching afterwards paints the already-trimmed window.
    chart.notify_attached(Viewport::new(640, 480))?;
    assert_eq!(chart.target("a").unwrap().values.len(), 3);
    Ok(())
}

#[test]
fn focus_dims_and_revert_restores() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0]), ("b", &[2.0])])))?;

    chart.focus(&["a".to_owned()])?;
    chart.revert(&[])?;
    // Defocus is focus's complement: dim the listed targets instead.
    chart.defocus(&["b".to_owned()])?;
    chart.revert(&[])?;
    let missing = chart.focus(&["nope".to_owned()]);
    assert!(matches!(missing, Err(ChartError::UnknownTarget(_))));
    Ok(())
}

#[test]
fn revert_can_restore_a_single_dimmed_target() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[
        ("a", &[1.0]),
        ("b", &[2.0]),
        ("c", &[3.0]),
    ])))?;

    chart.focus(&["a".to_owned()])?;
    // Un-dim "b" only; "c" stays dimmed.
    chart.revert(&["b".to_owned()])?;
    assert_eq!(
        chart.focused_ids(),
        Some(["a".to_owned(), "b".to_owned()].as_slice())
    );

    // Restoring the last dimmed target clears the focus state.
    chart.revert(&["c".to_owned()])?;
    assert_eq!(chart.focused_ids(), None);
    Ok(())
}

#[test]
fn configured_size_overrides_the_reported_viewport() -> ChartResult<()> {
    let mut config = config_with(columns(&[("a", &[1.0, 2.0])]));
    config.size.width = Some(320);

    let resized = Rc::new(Cell::new((0u32, 0u32)));
    let callbacks = ChartCallbacks {
        on_resized: Some(Box::new({
            let resized = Rc::clone(&resized);
            move |w, h| resized.set((w, h))
        })),
        ..ChartCallbacks::default()
    };

    let mut chart = Chart::generate(config, callbacks)?;
    chart.notify_attached(Viewport::new(640, 480))?;
    assert_eq!(chart.frame()?.viewport, Viewport::new(320, 480));

    // Height follows the host; the fixed width sticks.
    chart.resize(800, 600)?;
    assert_eq!(resized.get(), (320, 600));
    Ok(())
}

#[test]
fn target_colors_cycle_the_pattern_with_overrides() -> ChartResult<()> {
    let mut data = columns(&[("a", &[1.0]), ("b", &[2.0]), ("c", &[3.0])]);
    data.colors
        .insert("b".to_owned(), "#bada55".to_owned());
    let mut config = config_with(data);
    config.color.pattern = vec!["red".to_owned(), "green".to_owned()];

    let chart = attached(config)?;
    assert_eq!(chart.target_color("a")?, "red");
    assert_eq!(chart.target_color("b")?, "#bada55");
    // Position 2 wraps around the two-entry pattern.
    assert_eq!(chart.target_color("c")?, "red");
    assert!(matches!(
        chart.target_color("nope"),
        Err(ChartError::UnknownTarget(_))
    ));
    Ok(())
}

#[test]
fn target_names_fall_back_to_the_id() -> ChartResult<()> {
    let mut data = columns(&[("dl", &[1.0]), ("ul", &[2.0])]);
    data.names.insert("dl".to_owned(), "Downloads".to_owned());

    let chart = attached(config_with(data))?;
    assert_eq!(chart.target_name("dl")?, "Downloads");
    assert_eq!(chart.target_name("ul")?, "ul");
    assert!(matches!(
        chart.target_name("nope"),
        Err(ChartError::UnknownTarget(_))
    ));
    Ok(())
}

#[test]
fn explicit_categories_override_scraped_labels() -> ChartResult<()> {
    let mut config = config_with(columns(&[("a", &[1.0, 2.0, 3.0])]));
    config.axis.x.kind = plotline::config::XAxisKind::Category;
    config.axis.x.categories = vec!["jan".to_owned(), "feb".to_owned(), "mar".to_owned()];

    let chart = attached(config)?;
    assert_eq!(chart.categories(), ["jan", "feb", "mar"]);
    Ok(())
}

#[test]
fn resize_fires_both_callbacks() -> ChartResult<()> {
    let sizes = Rc::new(Cell::new((0u32, 0u32)));
    let callbacks = ChartCallbacks {
        on_resized: Some(Box::new({
            let sizes = Rc::clone(&sizes);
            move |w, h| sizes.set((w, h))
        })),
        ..ChartCallbacks::default()
    };

    let mut chart = Chart::generate(config_with(columns(&[("a", &[1.0])])), callbacks)?;
    chart.notify_attached(Viewport::new(640, 480))?;
    chart.resize(800, 600)?;
    assert_eq!(sizes.get(), (800, 600));
    Ok(())
}

#[test]
fn hit_testing_uses_the_last_drawn_geometry() -> ChartResult<()> {
    let mut data = columns(&[("a", &[10.0, 20.0, 30.0])]);
    data.kind = Some(ShapeKind::Bar);
    let mut chart = attached(config_with(data))?;
    chart.flush()?;

    // The middle bar occupies the horizontal center of the plot area.
    let layout_center = Point::new(295.0, 400.0);
    let hit = chart.hit(layout_center).unwrap();
    assert_eq!(hit.target_id, "a");
    assert_eq!(hit.index, 1);
    Ok(())
}

#[test]
fn render_accepts_any_backend() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0, 2.0])])))?;
    let mut backend = NullRenderer::default();
    chart.render(&mut backend)?;
    Ok(())
}

#[test]
fn destroyed_charts_reject_every_operation() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0])])))?;

    chart.destroy();
    chart.destroy();
    assert!(chart.is_destroyed());

    let result = chart.load(columns(&[("b", &[1.0])]));
    assert!(matches!(result, Err(ChartError::Destroyed)));
    assert!(matches!(chart.tick(10), Err(ChartError::Destroyed)));
    Ok(())
}

#[test]
fn background_charts_snap_instead_of_animating() -> ChartResult<()> {
    let mut chart = attached(config_with(columns(&[("a", &[1.0, 2.0])])))?;
    chart.flush()?;

    chart.set_visibility(false);
    chart.load(columns(&[("a", &[5.0, 6.0])]))?;
    // Zero-duration pass: nothing is left animating.
    let frame = chart.frame()?;
    assert!(!frame.nodes.is_empty());
    chart.tick(1)?;
    Ok(())
}
