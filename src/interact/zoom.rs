//! Zoom window arithmetic over the canonical x domain.

use crate::error::{ChartError, ChartResult};

/// Default minimum zoom window as a fraction of the canonical domain span.
const DEFAULT_MIN_WINDOW_RATIO: f64 = 0.01;

/// Clamps a requested zoom window into the canonical (org) x domain.
///
/// The window is reordered if reversed, clipped to the canonical bounds and
/// widened to the minimum window when the request is narrower. The canonical
/// domain itself never changes under zoom.
pub fn clamp_zoom_window(
    org_domain: (f64, f64),
    requested: [f64; 2],
    min_window: Option<f64>,
) -> ChartResult<[f64; 2]> {
    let [a, b] = requested;
    if !a.is_finite() || !b.is_finite() {
        return Err(ChartError::InvalidData(
            "zoom window bounds must be finite".to_owned(),
        ));
    }

    let (org_lo, org_hi) = if org_domain.0 <= org_domain.1 {
        org_domain
    } else {
        (org_domain.1, org_domain.0)
    };
    let org_span = org_hi - org_lo;
    let floor = min_window.unwrap_or(org_span * DEFAULT_MIN_WINDOW_RATIO);

    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    lo = lo.clamp(org_lo, org_hi);
    hi = hi.clamp(org_lo, org_hi);

    // Widen a too-narrow window symmetrically, sliding back inside the
    // canonical bounds when the widening overshoots an edge.
    if hi - lo < floor {
        let center = (lo + hi) / 2.0;
        lo = center - floor / 2.0;
        hi = center + floor / 2.0;
        if lo < org_lo {
            hi += org_lo - lo;
            lo = org_lo;
        }
        if hi > org_hi {
            lo -= hi - org_hi;
            hi = org_hi;
        }
        lo = lo.max(org_lo);
    }

    Ok([lo, hi])
}

/// Magnification of a window relative to the canonical domain span.
#[must_use]
pub fn zoom_ratio(org_domain: (f64, f64), window: [f64; 2]) -> f64 {
    let org_span = (org_domain.1 - org_domain.0).abs();
    let window_span = (window[1] - window[0]).abs();
    if window_span == 0.0 {
        return 1.0;
    }
    org_span / window_span
}
