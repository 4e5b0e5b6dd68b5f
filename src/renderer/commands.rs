//! Draw command definitions and a surface that records them.

use crate::texture::Texture;
use crate::widgets::Rect;

use super::DrawSurface;

/// A single stretched blit: `texture` scaled to exactly cover `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Texture to draw
    pub texture: Texture,
    /// Destination rectangle in surface coordinates
    pub rect: Rect,
}

impl DrawCommand {
    pub fn stretched(texture: Texture, rect: Rect) -> Self {
        Self { texture, rect }
    }
}

/// Surface that keeps every draw call in order instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn draw_stretched(&mut self, texture: &Texture, rect: Rect) {
        self.commands
            .push(DrawCommand::stretched(texture.clone(), rect));
    }
}
