use plotline::axis::{CharSize, cull_stride, nice_ticks, wrap_label};
use plotline::interact::clamp_zoom_window;
use plotline::scale::{CategoryScale, LinearScale};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_scale_round_trips_through_invert(
        domain_start in -10_000.0f64..10_000.0,
        span in 1.0f64..10_000.0,
        range_len in 10.0f64..2_000.0,
        fraction in 0.0f64..1.0
    ) {
        let domain_end = domain_start + span;
        let scale = LinearScale::new(domain_start, domain_end, 0.0, range_len)
            .expect("valid scale");

        let x = domain_start + span * fraction;
        let round_trip = scale.invert(scale.scale(x));
        prop_assert!((round_trip - x).abs() <= span * 1e-9 + 1e-7);
    }

    #[test]
    fn linear_scale_is_monotonic(
        domain_start in -1_000.0f64..1_000.0,
        span in 1.0f64..1_000.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0
    ) {
        let scale = LinearScale::new(domain_start, domain_start + span, 0.0, 500.0)
            .expect("valid scale");
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let px_lo = scale.scale(domain_start + span * lo);
        let px_hi = scale.scale(domain_start + span * hi);
        prop_assert!(px_lo <= px_hi + 1e-9);
    }

    #[test]
    fn category_centers_fall_inside_the_range(
        count in 1usize..200,
        range_len in 10.0f64..2_000.0,
        index in 0usize..200
    ) {
        let index = index % count;
        let scale = CategoryScale::new(count, 0.0, range_len).expect("valid scale");
        let center = scale.scale_centered(index as f64);
        prop_assert!(center >= 0.0);
        prop_assert!(center <= range_len);
    }

    #[test]
    fn nice_ticks_are_sorted_and_within_one_step(
        lo in -10_000.0f64..10_000.0,
        span in 0.001f64..10_000.0,
        count in 1usize..30
    ) {
        let hi = lo + span;
        let ticks = nice_ticks(lo, hi, count);
        for pair in ticks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for tick in &ticks {
            prop_assert!(*tick >= lo - span);
            prop_assert!(*tick <= hi + span);
        }
    }

    #[test]
    fn culling_respects_the_display_maximum(
        tick_count in 1usize..500,
        max_displayed in 1usize..50
    ) {
        let stride = cull_stride(tick_count, max_displayed);
        let visible = tick_count.div_ceil(stride);
        prop_assert!(visible <= max_displayed);
    }

    #[test]
    fn wrapped_lines_stay_within_the_character_budget(
        text in "[ a-z]{0,30}",
        budget_chars in 1usize..20
    ) {
        let char_size = CharSize::default();
        let budget_px = budget_chars as f64 * char_size.width;
        let lines = wrap_label(&text, budget_px, char_size);

        prop_assert!(!lines.is_empty());
        for line in &lines {
            prop_assert!(line.chars().count() <= budget_chars);
        }
        // Wrapping never invents or loses non-whitespace characters.
        let rejoined: String = lines.concat();
        let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let kept: String = rejoined.chars().filter(|c| !c.is_whitespace()).collect();
        prop_assert_eq!(original, kept);
    }

    #[test]
    fn clamped_zoom_windows_stay_inside_the_domain(
        org_lo in -1_000.0f64..1_000.0,
        org_span in 1.0f64..1_000.0,
        a in -2_000.0f64..2_000.0,
        b in -2_000.0f64..2_000.0
    ) {
        let org_hi = org_lo + org_span;
        let window = clamp_zoom_window((org_lo, org_hi), [a, b], None)
            .expect("finite window");
        prop_assert!(window[0] <= window[1]);
        prop_assert!(window[0] >= org_lo - 1e-9);
        prop_assert!(window[1] <= org_hi + 1e-9);
    }
}
