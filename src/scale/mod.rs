pub mod category;
pub mod domain;
pub mod linear;

pub use category::CategoryScale;
pub use domain::{
    GroupSums, group_sums, max_data_count, resolve_stack_groups, x_domain, y_domain,
};
pub use linear::LinearScale;

/// Live X scale handed to the axis engine and shape generators: a plain
/// linear/temporal mapping, or a category scale with its half-step offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XScale {
    Linear(LinearScale),
    Category(CategoryScale),
}

impl XScale {
    #[must_use]
    pub fn scale(self, x: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.scale(x),
            Self::Category(scale) => scale.scale(x),
        }
    }

    /// Pixel position where a datum of this x value is anchored. Category
    /// values anchor at the interval midpoint.
    #[must_use]
    pub fn scale_datum(self, x: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.scale(x),
            Self::Category(scale) => scale.scale_centered(x),
        }
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.invert(pixel),
            Self::Category(scale) => scale.invert(pixel),
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.domain(),
            Self::Category(scale) => scale.domain(),
        }
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Category(scale) => scale.range(),
        }
    }

    #[must_use]
    pub fn is_category(self) -> bool {
        matches!(self, Self::Category(_))
    }

    /// Half-step centering offset; zero for continuous scales.
    #[must_use]
    pub fn tick_offset(self) -> f64 {
        match self {
            Self::Linear(_) => 0.0,
            Self::Category(scale) => scale.tick_offset(),
        }
    }
}
