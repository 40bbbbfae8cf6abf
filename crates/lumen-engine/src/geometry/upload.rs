use crate::device::{BufferUsage, Device, MeshId};
use crate::error::BuildError;

use super::mesh::{Geometry, Mesh};
use super::vertex::Vertex;

/// Copies `geometry` verbatim into immutable device buffers.
///
/// The vertex buffer holds `vertex_count * 12` bytes and the index buffer, when
/// present, `index_count * 4` bytes.
pub fn upload<D: Device + ?Sized>(device: &mut D, geometry: &Geometry) -> Result<MeshId, BuildError> {
    geometry.validate(&Vertex::layout())?;

    let vertex_buffer = device.create_buffer(
        &format!("{} vertices", geometry.label),
        BufferUsage::Vertex,
        bytemuck::cast_slice(&geometry.vertices),
    );

    let index_buffer = geometry.indices.as_ref().map(|indices| {
        device.create_buffer(
            &format!("{} indices", geometry.label),
            BufferUsage::Index,
            bytemuck::cast_slice(indices),
        )
    });

    let draw = geometry.draw_call();
    let mesh = device.create_mesh(Mesh {
        vertex_buffer,
        index_buffer,
        draw,
    })?;

    log::debug!("uploaded `{}` ({draw:?})", geometry.label);
    Ok(mesh)
}
