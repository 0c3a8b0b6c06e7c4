//! Backend-agnostic frame handed to a renderer.

use crate::error::{ChartError, ChartResult};
use crate::render::primitives::Primitive;
use crate::render::scene::SceneKey;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One chart draw pass: the scene snapshot in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub viewport: Viewport,
    pub nodes: Vec<(SceneKey, Primitive)>,
}

impl SceneFrame {
    #[must_use]
    pub fn new(viewport: Viewport, nodes: Vec<(SceneKey, Primitive)>) -> Self {
        Self { viewport, nodes }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for (_, primitive) in &self.nodes {
            primitive.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Rendering backend seam; concrete backends live with the host.
pub trait Renderer {
    fn render(&mut self, frame: &SceneFrame) -> ChartResult<()>;
}

/// Discards frames after validating them. Useful for tests and headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &SceneFrame) -> ChartResult<()> {
        frame.validate()
    }
}
