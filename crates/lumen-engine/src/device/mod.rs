//! Graphics device.
//!
//! [`Device`] is the seam between the render bootstrap and the native graphics
//! API. Resources are addressed through generational handles owned by a
//! [`ResourceArena`]; [`Gpu`] is the wgpu implementation.

mod arena;
mod frame;
mod gpu;
mod init;
mod surface;

pub use arena::{BufferId, MeshId, ProgramId, ResourceArena, ResourceCounts, ShaderId};
pub use frame::{FrameOutcome, FramePass};
pub use gpu::{AdapterSummary, Gpu};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;

use crate::error::{BuildError, FrameError};
use crate::geometry::{Mesh, VertexLayout};
use crate::shader::ShaderSource;

/// How a buffer will be bound.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// Graphics operations used by the builder, the uploader and the frame loop.
pub trait Device {
    /// Compiles one shader stage. Failures carry the compiler log.
    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, BuildError>;

    /// Links a vertex and a fragment stage into a program.
    ///
    /// The shader handles stay live; the caller releases them.
    fn link_program(
        &mut self,
        label: &str,
        vertex: ShaderId,
        fragment: ShaderId,
        layout: &VertexLayout,
    ) -> Result<ProgramId, BuildError>;

    fn release_shader(&mut self, shader: ShaderId);

    /// Uploads `contents` once into an immutable buffer.
    fn create_buffer(&mut self, label: &str, usage: BufferUsage, contents: &[u8]) -> BufferId;

    /// Byte length of a live buffer.
    fn buffer_len(&self, buffer: BufferId) -> Option<u64>;

    fn create_mesh(&mut self, mesh: Mesh) -> Result<MeshId, BuildError>;

    /// Clears, draws and presents one frame.
    fn render(&mut self, pass: &FramePass) -> Result<FrameOutcome, FrameError>;

    /// Releases every resource the device owns. Safe to call repeatedly.
    fn release_all(&mut self) -> ResourceCounts;
}
