//! plotline: declarative-to-imperative chart rendering engine.
//!
//! Given a dataset and a configuration tree, the engine computes scales and
//! domains, lays out axis ticks, generates shape geometry, and reconciles a
//! persistent scene graph across repeated data updates, driving time-bounded
//! transitions joined by a single completion barrier per redraw.

pub mod anim;
pub mod api;
pub mod axis;
pub mod config;
pub mod data;
pub mod error;
pub mod interact;
pub mod pipeline;
pub mod render;
pub mod scale;
pub mod shape;
pub mod telemetry;

pub use api::Chart;
pub use config::{ChartCallbacks, ChartConfig};
pub use error::{ChartError, ChartResult};
