use std::fmt;

use bytemuck::{Pod, Zeroable};

/// How the bits of one component are interpreted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScalarKind {
    Float,
    Sint,
    Uint,
    Bool,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Float => "f32",
            ScalarKind::Sint => "i32",
            ScalarKind::Uint => "u32",
            ScalarKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Attribute component format.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub const fn components(self) -> u64 {
        match self {
            VertexFormat::Float32x2 => 2,
            VertexFormat::Float32x3 => 3,
            VertexFormat::Float32x4 => 4,
        }
    }

    /// Component kind the shader sees when reading this attribute.
    pub const fn scalar_kind(self) -> ScalarKind {
        ScalarKind::Float
    }

    /// Size in bytes; every component is a 32-bit float.
    pub const fn size(self) -> u64 {
        self.components() * 4
    }

    pub fn to_wgpu(self) -> wgpu::VertexFormat {
        match self {
            VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u64,
}

/// How raw vertex-buffer bytes are read as attributes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn attribute(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }

    /// Every attribute must fit inside one stride.
    pub fn is_consistent(&self) -> bool {
        self.stride > 0
            && self
                .attributes
                .iter()
                .all(|a| a.offset + a.format.size() <= self.stride)
    }
}

/// Position-only vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    /// One `Float32x3` position at location 0, tightly packed.
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: std::mem::size_of::<Vertex>() as u64,
            attributes: vec![VertexAttribute {
                location: 0,
                format: VertexFormat::Float32x3,
                offset: 0,
            }],
        }
    }
}
