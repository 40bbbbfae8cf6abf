//! Test doubles for the windowing and graphics seams.

use std::sync::Mutex;

use crate::coords::FramebufferSize;
use crate::device::{
    BufferId, BufferUsage, Device, FrameOutcome, FramePass, MeshId, ProgramId, ResourceArena,
    ResourceCounts, ShaderId,
};
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::error::{BuildError, FrameError};
use crate::geometry::{Mesh, VertexLayout};
use crate::input::Key;
use crate::shader::{self, CompiledShader, ShaderSource};
use crate::window::Platform;

/// Scripted window.
pub(crate) struct MockPlatform {
    /// Framebuffer size reported for each frame; the last entry repeats.
    pub sizes: Vec<FramebufferSize>,
    /// Poll after which the window reports a close request.
    pub close_on_poll: Option<usize>,
    pub escape_down: bool,

    pub polls: usize,
    pub close_requested: bool,
    pub close_calls: usize,
    pub destroy_calls: usize,
    pub windows_destroyed: usize,
    window_alive: bool,
}

impl MockPlatform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            sizes: vec![FramebufferSize::new(width, height)],
            close_on_poll: None,
            escape_down: false,
            polls: 0,
            close_requested: false,
            close_calls: 0,
            destroy_calls: 0,
            windows_destroyed: 0,
            window_alive: true,
        }
    }

    pub fn closing_on_poll(mut self, poll: usize) -> Self {
        self.close_on_poll = Some(poll);
        self
    }
}

impl Platform for MockPlatform {
    fn poll_events(&mut self) {
        self.polls += 1;
        if self.close_on_poll == Some(self.polls) {
            self.close_requested = true;
        }
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_calls += 1;
        self.close_requested = true;
    }

    fn key_down(&self, key: Key) -> bool {
        key == Key::Escape && self.escape_down
    }

    fn framebuffer_size(&self) -> FramebufferSize {
        // One poll per frame, so the poll count is the current frame index.
        let at = self.polls.min(self.sizes.len().saturating_sub(1));
        self.sizes.get(at).copied().unwrap_or_default()
    }

    fn destroy(&mut self) {
        self.destroy_calls += 1;
        if self.window_alive {
            self.window_alive = false;
            self.windows_destroyed += 1;
        }
    }
}

struct MockBuffer {
    usage: BufferUsage,
    bytes: Vec<u8>,
}

/// Records every call instead of talking to a GPU.
///
/// Shaders go through the real compiler so broken WGSL fails exactly as it
/// would on a device.
pub(crate) struct MockDevice {
    resources: ResourceArena<CompiledShader, String, MockBuffer>,
    /// Every pass handed to `render`, in order.
    pub passes: Vec<FramePass>,
    pub shaders_released: usize,
    pub release_all_calls: usize,
    /// `render` fails with out-of-memory on this pass index.
    pub fail_on_pass: Option<usize>,
    /// `render` reports `Skipped` for these pass indices.
    pub skip_passes: Vec<usize>,
    render_calls: usize,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            resources: ResourceArena::new(),
            passes: Vec::new(),
            shaders_released: 0,
            release_all_calls: 0,
            fail_on_pass: None,
            skip_passes: Vec::new(),
            render_calls: 0,
        }
    }

    pub fn live(&self) -> ResourceCounts {
        self.resources.live()
    }

    pub fn has_program(&self, id: ProgramId) -> bool {
        self.resources.program(id).is_some()
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.resources.mesh(id)
    }

    pub fn buffer_usage(&self, id: BufferId) -> Option<BufferUsage> {
        self.resources.buffer(id).map(|b| b.usage)
    }

    pub fn buffer_bytes(&self, id: BufferId) -> Option<&[u8]> {
        self.resources.buffer(id).map(|b| b.bytes.as_slice())
    }
}

impl Device for MockDevice {
    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, BuildError> {
        let compiled = shader::compile(source)?;
        Ok(self.resources.insert_shader(compiled))
    }

    fn link_program(
        &mut self,
        label: &str,
        vertex: ShaderId,
        fragment: ShaderId,
        layout: &VertexLayout,
    ) -> Result<ProgramId, BuildError> {
        let (Some(vs), Some(fs)) = (self.resources.shader(vertex), self.resources.shader(fragment))
        else {
            return Err(BuildError::StaleHandle("shader"));
        };
        shader::link(label, vs, fs, layout)?;
        Ok(self.resources.insert_program(label.to_string()))
    }

    fn release_shader(&mut self, shader: ShaderId) {
        if self.resources.remove_shader(shader).is_some() {
            self.shaders_released += 1;
        }
    }

    fn create_buffer(&mut self, _label: &str, usage: BufferUsage, contents: &[u8]) -> BufferId {
        self.resources.insert_buffer(MockBuffer {
            usage,
            bytes: contents.to_vec(),
        })
    }

    fn buffer_len(&self, buffer: BufferId) -> Option<u64> {
        self.resources.buffer(buffer).map(|b| b.bytes.len() as u64)
    }

    fn create_mesh(&mut self, mesh: Mesh) -> Result<MeshId, BuildError> {
        self.resources.insert_mesh(mesh)
    }

    fn render(&mut self, pass: &FramePass) -> Result<FrameOutcome, FrameError> {
        let call = self.render_calls;
        self.render_calls += 1;

        if !self.has_program(pass.program) {
            return Err(FrameError::StaleHandle("program"));
        }
        if self.resources.mesh(pass.mesh).is_none() {
            return Err(FrameError::StaleHandle("mesh"));
        }
        if self.fail_on_pass == Some(call) {
            return Err(FrameError::OutOfMemory);
        }
        if self.skip_passes.contains(&call) {
            return Ok(FrameOutcome::Skipped);
        }

        self.passes.push(*pass);
        Ok(FrameOutcome::Presented)
    }

    fn release_all(&mut self) -> ResourceCounts {
        self.release_all_calls += 1;
        self.resources.release_all()
    }
}

/// Collects diagnostics for inspection.
#[derive(Default)]
pub(crate) struct RecordingSink {
    reported: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.reported.lock().unwrap())
    }
}

impl DiagnosticsSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.reported.lock().unwrap().push(diagnostic);
    }
}
