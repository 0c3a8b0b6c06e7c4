//! Tick value generation, explicit count reduction, and display culling.

/// "Nice" ticks over a continuous domain: a 1/2/5 power-of-ten step ladder,
/// endpoints rounded outward-in so every tick is a step multiple.
#[must_use]
pub fn nice_ticks(domain_start: f64, domain_end: f64, target_count: usize) -> Vec<f64> {
    if target_count == 0 || !domain_start.is_finite() || !domain_end.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if domain_start <= domain_end {
        (domain_start, domain_end)
    } else {
        (domain_end, domain_start)
    };
    let span = hi - lo;
    if span <= 0.0 {
        return vec![lo];
    }

    let step = nice_step(span / target_count.max(1) as f64);
    let epsilon = step / 10.0;
    let first = (lo / step).ceil() * step;

    let mut ticks = Vec::new();
    let mut tick = first;
    while tick <= hi + epsilon {
        // Snap near-zero steps artifacts like -0.0 and 1.0000000000000002.
        let snapped = (tick / step).round() * step;
        ticks.push(if snapped == 0.0 { 0.0 } else { snapped });
        tick += step;
    }

    if domain_start > domain_end {
        ticks.reverse();
    }
    ticks
}

/// Smallest ladder step (1, 2, or 5 times a power of ten) at least `raw`.
fn nice_step(raw: f64) -> f64 {
    let power = 10_f64.powf(raw.abs().log10().floor());
    let fraction = raw / power;
    let ladder = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    ladder * power
}

/// Enumerates every integer inside the domain, used by ordinal/category axes
/// that have no native tick generator. When the first tick is non-zero, one
/// extra tick a full interval earlier is prepended so the leading label is
/// not orphaned against the axis edge.
#[must_use]
pub fn integer_ticks(domain_start: f64, domain_end: f64) -> Vec<f64> {
    if !domain_start.is_finite() || !domain_end.is_finite() {
        return Vec::new();
    }
    let mut ticks = Vec::new();
    let mut tick = domain_start.ceil();
    while tick < domain_end {
        ticks.push(tick);
        tick += 1.0;
    }
    if let Some(first) = ticks.first().copied()
        && first != 0.0
    {
        let step = match ticks.get(1) {
            Some(second) => second - first,
            None => 1.0,
        };
        ticks.insert(0, first - step);
    }
    ticks
}

/// Reduces ticks to an explicit count: both endpoints plus `count - 2`
/// evenly spaced interior values. Temporal ticks keep generation order (the
/// interpolation already ascends); others are sorted ascending.
#[must_use]
pub fn reduce_ticks(domain_start: f64, domain_end: f64, count: usize, temporal: bool) -> Vec<f64> {
    let mut ticks = match count {
        0 => Vec::new(),
        1 => vec![domain_start],
        2 => vec![domain_start, domain_end],
        _ => {
            let interior = count - 2;
            let interval = (domain_end - domain_start) / (interior + 1) as f64;
            let mut values = Vec::with_capacity(count);
            values.push(domain_start);
            for step in 0..interior {
                values.push(domain_start + interval * (step + 1) as f64);
            }
            values.push(domain_end);
            values
        }
    };
    if !temporal {
        ticks.sort_by(f64::total_cmp);
    }
    ticks
}

/// Smallest stride `s` such that `tick_count / s < max_displayed`; every tick
/// whose array position is not a multiple of `s` is hidden. Display-only:
/// ticks stay in the join so indices remain stable across transitions.
#[must_use]
pub fn cull_stride(tick_count: usize, max_displayed: usize) -> usize {
    if max_displayed == 0 || tick_count == 0 {
        return 1;
    }
    (1..=tick_count)
        .find(|stride| (tick_count as f64) / (*stride as f64) < max_displayed as f64)
        .unwrap_or(tick_count)
}
