//! Geometry upload.
//!
//! Host-side vertex/index data, the layout describing it, and the upload step
//! that turns it into an immutable [`Mesh`] on the device.

mod mesh;
mod upload;
mod vertex;

pub use mesh::{DrawCall, Geometry, Mesh};
pub use upload::upload;
pub use vertex::{ScalarKind, Vertex, VertexAttribute, VertexFormat, VertexLayout};
