use crate::device::BufferId;
use crate::error::BuildError;

use super::vertex::{Vertex, VertexLayout};

/// Draw call issued for a mesh each frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCall {
    Arrays { vertex_count: u32 },
    Indexed { index_count: u32 },
}

/// Uploaded geometry: buffers and how to draw them.
///
/// The vertex layout belongs to the program the mesh is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Mesh {
    pub vertex_buffer: BufferId,
    pub index_buffer: Option<BufferId>,
    pub draw: DrawCall,
}

/// Host-side triangle-list geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub label: String,
    pub vertices: Vec<Vertex>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    /// Single triangle, drawn without indices.
    pub fn triangle() -> Self {
        Self {
            label: "triangle".to_string(),
            vertices: vec![
                Vertex::new(-0.5, -0.5, 0.0),
                Vertex::new(0.5, -0.5, 0.0),
                Vertex::new(0.0, 0.5, 0.0),
            ],
            indices: None,
        }
    }

    /// Two triangles sharing an edge, drawn from an index buffer.
    pub fn quad() -> Self {
        Self {
            label: "quad".to_string(),
            vertices: vec![
                Vertex::new(0.5, 0.5, 0.0),   // top right
                Vertex::new(0.5, -0.5, 0.0),  // bottom right
                Vertex::new(-0.5, -0.5, 0.0), // bottom left
                Vertex::new(-0.5, 0.5, 0.0),  // top left
            ],
            indices: Some(vec![0, 1, 3, 1, 2, 3]),
        }
    }

    pub fn draw_call(&self) -> DrawCall {
        match &self.indices {
            Some(indices) => DrawCall::Indexed {
                index_count: indices.len() as u32,
            },
            None => DrawCall::Arrays {
                vertex_count: self.vertices.len() as u32,
            },
        }
    }

    /// Checks the data against `layout` before anything reaches the device.
    pub fn validate(&self, layout: &VertexLayout) -> Result<(), BuildError> {
        let invalid = |reason: String| BuildError::Geometry {
            label: self.label.clone(),
            reason,
        };

        let vertex_size = std::mem::size_of::<Vertex>() as u64;
        if layout.stride != vertex_size || !layout.is_consistent() {
            return Err(invalid(format!(
                "layout stride {} does not describe {vertex_size}-byte vertices",
                layout.stride
            )));
        }

        if self.vertices.is_empty() {
            return Err(invalid("no vertices".to_string()));
        }
        let vertex_count = u32::try_from(self.vertices.len())
            .map_err(|_| invalid(format!("{} vertices exceed u32", self.vertices.len())))?;

        match &self.indices {
            None if vertex_count % 3 != 0 => Err(invalid(format!(
                "{vertex_count} vertices do not form whole triangles"
            ))),
            None => Ok(()),
            Some(indices) if indices.is_empty() || indices.len() % 3 != 0 => Err(invalid(format!(
                "{} indices do not form whole triangles",
                indices.len()
            ))),
            Some(indices) => match indices.iter().position(|i| *i >= vertex_count) {
                Some(at) => Err(invalid(format!(
                    "index {} at position {at} is out of range for {vertex_count} vertices",
                    indices[at]
                ))),
                None => Ok(()),
            },
        }
    }
}
