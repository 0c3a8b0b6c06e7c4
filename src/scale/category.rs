//! Category axis scale.
//!
//! Wraps a linear scale over the integer convention `[0, N]` while reporting
//! the raw internal domain `[0, N - 1]` through `org_domain`, and injects a
//! per-tick half-step offset so category labels center between grid lines.

use crate::error::{ChartError, ChartResult};
use crate::scale::linear::LinearScale;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScale {
    inner: LinearScale,
    count: usize,
}

impl CategoryScale {
    pub fn new(count: usize, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if count == 0 {
            return Err(ChartError::InvalidData(
                "category scale needs at least one category".to_owned(),
            ));
        }
        let inner = LinearScale::new(0.0, count as f64, range_start, range_end)?;
        Ok(Self { inner, count })
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// External domain convention `[first, last + 1]`.
    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (0.0, self.count as f64)
    }

    /// Raw internal domain `[first, last]`.
    #[must_use]
    pub fn org_domain(self) -> (f64, f64) {
        (0.0, (self.count - 1) as f64)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.inner.range()
    }

    /// Pixel width of one category interval.
    #[must_use]
    pub fn step(self) -> f64 {
        self.inner.range_len() / self.count as f64
    }

    /// Left edge of a category interval.
    #[must_use]
    pub fn scale(self, index: f64) -> f64 {
        self.inner.scale(index)
    }

    /// Interval midpoint, where the category label sits.
    #[must_use]
    pub fn scale_centered(self, index: f64) -> f64 {
        self.inner.scale(index) + self.tick_offset()
    }

    /// Half-step label/tick offset.
    #[must_use]
    pub fn tick_offset(self) -> f64 {
        self.step() / 2.0
    }

    /// Pixel back to (fractional) category index.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        self.inner.invert(pixel)
    }
}
