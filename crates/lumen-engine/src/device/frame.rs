use crate::coords::Viewport;
use crate::paint::Color;

use super::arena::{MeshId, ProgramId};

/// Everything one frame draws: clear, bind, draw, present.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FramePass {
    pub viewport: Viewport,
    pub clear: Color,
    pub program: ProgramId,
    pub mesh: MeshId,
}

/// Result of rendering a [`FramePass`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// The surface could not provide a frame; nothing was drawn.
    Skipped,
}
