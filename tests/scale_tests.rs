use approx::assert_relative_eq;
use plotline::scale::{CategoryScale, LinearScale, XScale};

#[test]
fn linear_scale_maps_domain_to_range() {
    let scale = LinearScale::new(0.0, 10.0, 0.0, 100.0).expect("valid scale");
    assert_relative_eq!(scale.scale(0.0), 0.0);
    assert_relative_eq!(scale.scale(5.0), 50.0);
    assert_relative_eq!(scale.scale(10.0), 100.0);
    assert_relative_eq!(scale.invert(50.0), 5.0);
}

#[test]
fn linear_scale_supports_reversed_ranges() {
    // Y scales run top-down: pixel 0 is the domain maximum.
    let scale = LinearScale::new(0.0, 10.0, 100.0, 0.0).expect("valid scale");
    assert_relative_eq!(scale.scale(0.0), 100.0);
    assert_relative_eq!(scale.scale(10.0), 0.0);
    assert_relative_eq!(scale.invert(25.0), 7.5);
}

#[test]
fn linear_scale_rejects_degenerate_domains() {
    assert!(LinearScale::new(5.0, 5.0, 0.0, 100.0).is_err());
    assert!(LinearScale::new(f64::NAN, 1.0, 0.0, 100.0).is_err());
    assert!(LinearScale::new(0.0, 1.0, f64::INFINITY, 100.0).is_err());
}

#[test]
fn with_domain_preserves_the_canonical_domain() {
    let scale = LinearScale::new(0.0, 10.0, 0.0, 100.0).expect("valid scale");
    let zoomed = scale.with_domain(2.0, 4.0).expect("zoomed");

    assert_eq!(zoomed.domain(), (2.0, 4.0));
    assert_eq!(zoomed.org_domain(), (0.0, 10.0));
    assert_relative_eq!(zoomed.scale(3.0), 50.0);

    let restored = zoomed.reset_domain();
    assert_eq!(restored.domain(), (0.0, 10.0));
}

#[test]
fn category_scale_live_and_canonical_domains_differ() {
    let scale = CategoryScale::new(4, 0.0, 400.0).expect("valid scale");
    // Live domain spans one past the last ordinal so every interval has
    // equal width; the canonical domain is the ordinal extent itself.
    assert_eq!(scale.domain(), (0.0, 4.0));
    assert_eq!(scale.org_domain(), (0.0, 3.0));
    assert_relative_eq!(scale.step(), 100.0);
}

#[test]
fn category_scale_centers_data_in_intervals() {
    let scale = CategoryScale::new(4, 0.0, 400.0).expect("valid scale");
    assert_relative_eq!(scale.scale(1.0), 100.0);
    assert_relative_eq!(scale.scale_centered(1.0), 150.0);
    assert_relative_eq!(scale.tick_offset(), 50.0);
}

#[test]
fn x_scale_enum_dispatches_datum_anchoring() {
    let linear = XScale::Linear(LinearScale::new(0.0, 10.0, 0.0, 100.0).expect("valid"));
    assert_relative_eq!(linear.scale_datum(5.0), linear.scale(5.0));
    assert_relative_eq!(linear.tick_offset(), 0.0);

    let category = XScale::Category(CategoryScale::new(2, 0.0, 100.0).expect("valid"));
    assert!(category.is_category());
    assert_relative_eq!(category.scale_datum(0.0), 25.0);
    assert_relative_eq!(category.scale(0.0), 0.0);
}

#[test]
fn category_invert_recovers_ordinal_positions() {
    let scale = CategoryScale::new(5, 0.0, 500.0).expect("valid scale");
    let pixel = scale.scale_centered(2.0);
    let recovered = scale.invert(pixel);
    assert!((recovered - 2.5).abs() < 1e-9);
}
