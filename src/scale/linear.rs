//! Immutable linear scale value object.
//!
//! Scales are rebuilt per redraw pass and passed explicitly to geometry
//! functions; nothing mutates a scale in place. Temporal domains are unix
//! seconds as f64.

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    org_start: f64,
    org_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-degenerate".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
            org_start: domain_start,
            org_end: domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Domain stored at construction, used as the zoom/brush reset point.
    #[must_use]
    pub fn org_domain(self) -> (f64, f64) {
        (self.org_start, self.org_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn range_len(self) -> f64 {
        (self.range_end - self.range_start).abs()
    }

    /// Rebuilds with a new live domain, preserving the original domain.
    pub fn with_domain(self, domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        let mut rebuilt = Self::new(domain_start, domain_end, self.range_start, self.range_end)?;
        rebuilt.org_start = self.org_start;
        rebuilt.org_end = self.org_end;
        Ok(rebuilt)
    }

    /// Restores the live domain to the original domain.
    #[must_use]
    pub fn reset_domain(self) -> Self {
        Self {
            domain_start: self.org_start,
            domain_end: self.org_end,
            ..self
        }
    }

    /// Domain value to pixel. Non-finite input propagates as NaN; gap
    /// filtering happens upstream.
    #[must_use]
    pub fn scale(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Pixel back to domain value.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let extent = self.range_end - self.range_start;
        let normalized = (pixel - self.range_start) / extent;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}
