use slotmap::{new_key_type, SlotMap};

use crate::error::BuildError;
use crate::geometry::Mesh;

new_key_type! {
    /// Compiled shader stage. Released once its program is linked.
    pub struct ShaderId;
    /// Linked program (render pipeline).
    pub struct ProgramId;
    /// Device-side buffer.
    pub struct BufferId;
    /// Vertex buffer + optional index buffer + draw call.
    pub struct MeshId;
}

/// Number of handles per kind, either live or released.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ResourceCounts {
    pub shaders: usize,
    pub programs: usize,
    pub buffers: usize,
    pub meshes: usize,
}

impl ResourceCounts {
    pub fn total(self) -> usize {
        self.shaders + self.programs + self.buffers + self.meshes
    }
}

/// Owns every device-side resource of a context.
///
/// Handles are generational keys; a released handle never aliases a newer
/// resource. [`release_all`](Self::release_all) drops everything at once.
pub struct ResourceArena<S, P, B> {
    shaders: SlotMap<ShaderId, S>,
    programs: SlotMap<ProgramId, P>,
    buffers: SlotMap<BufferId, B>,
    meshes: SlotMap<MeshId, Mesh>,
}

impl<S, P, B> Default for ResourceArena<S, P, B> {
    fn default() -> Self {
        Self {
            shaders: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            buffers: SlotMap::with_key(),
            meshes: SlotMap::with_key(),
        }
    }
}

impl<S, P, B> ResourceArena<S, P, B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_shader(&mut self, shader: S) -> ShaderId {
        self.shaders.insert(shader)
    }

    pub fn shader(&self, id: ShaderId) -> Option<&S> {
        self.shaders.get(id)
    }

    pub fn remove_shader(&mut self, id: ShaderId) -> Option<S> {
        self.shaders.remove(id)
    }

    pub fn insert_program(&mut self, program: P) -> ProgramId {
        self.programs.insert(program)
    }

    pub fn program(&self, id: ProgramId) -> Option<&P> {
        self.programs.get(id)
    }

    pub fn insert_buffer(&mut self, buffer: B) -> BufferId {
        self.buffers.insert(buffer)
    }

    pub fn buffer(&self, id: BufferId) -> Option<&B> {
        self.buffers.get(id)
    }

    /// Registers a mesh; every buffer it names must be live.
    pub fn insert_mesh(&mut self, mesh: Mesh) -> Result<MeshId, BuildError> {
        let buffers_live = self.buffers.contains_key(mesh.vertex_buffer)
            && mesh
                .index_buffer
                .is_none_or(|id| self.buffers.contains_key(id));
        if !buffers_live {
            return Err(BuildError::StaleHandle("buffer"));
        }
        Ok(self.meshes.insert(mesh))
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn live(&self) -> ResourceCounts {
        ResourceCounts {
            shaders: self.shaders.len(),
            programs: self.programs.len(),
            buffers: self.buffers.len(),
            meshes: self.meshes.len(),
        }
    }

    /// Drops every resource and returns how many of each were released.
    pub fn release_all(&mut self) -> ResourceCounts {
        let released = self.live();
        // Meshes only reference buffers by handle; drop order is free.
        self.meshes.clear();
        self.programs.clear();
        self.buffers.clear();
        self.shaders.clear();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DrawCall;

    type Arena = ResourceArena<&'static str, &'static str, Vec<u8>>;

    fn mesh(vertex_buffer: BufferId, index_buffer: Option<BufferId>) -> Mesh {
        Mesh {
            vertex_buffer,
            index_buffer,
            draw: DrawCall::Arrays { vertex_count: 3 },
        }
    }

    #[test]
    fn removed_shader_handle_goes_stale() {
        let mut arena = Arena::new();
        let id = arena.insert_shader("vs");
        assert_eq!(arena.remove_shader(id), Some("vs"));
        assert!(arena.shader(id).is_none());

        // A new shader reusing the slot must not answer to the old handle.
        let newer = arena.insert_shader("fs");
        assert!(arena.shader(id).is_none());
        assert_eq!(arena.shader(newer), Some(&"fs"));
    }

    #[test]
    fn mesh_requires_live_buffers() {
        let mut arena = Arena::new();
        let vbo = arena.insert_buffer(vec![0; 36]);
        assert!(arena.insert_mesh(mesh(vbo, None)).is_ok());

        let dead = BufferId::default();
        let err = arena.insert_mesh(mesh(vbo, Some(dead))).unwrap_err();
        assert!(matches!(err, BuildError::StaleHandle("buffer")));
    }

    #[test]
    fn release_all_empties_every_kind() {
        let mut arena = Arena::new();
        arena.insert_shader("vs");
        arena.insert_program("basic");
        let vbo = arena.insert_buffer(vec![0; 36]);
        let mesh_id = arena.insert_mesh(mesh(vbo, None)).unwrap();

        let released = arena.release_all();
        assert_eq!(
            released,
            ResourceCounts { shaders: 1, programs: 1, buffers: 1, meshes: 1 }
        );
        assert_eq!(arena.live().total(), 0);
        assert!(arena.mesh(mesh_id).is_none());

        assert_eq!(arena.release_all().total(), 0);
    }
}
