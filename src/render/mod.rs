//! Scene graph, primitives and the renderer seam.

pub mod frame;
pub mod primitives;
pub mod scene;

pub use frame::{NullRenderer, Renderer, SceneFrame, Viewport};
pub use primitives::{
    ArcPrimitive, CirclePrimitive, PathPrimitive, PolygonPrimitive, Primitive, RectPrimitive,
    TextPrimitive,
};
pub use scene::{Layer, ReconcileStats, SceneGraph, SceneKey};
