use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// WGSL source for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: Cow<'static, str>,
    pub stage: ShaderStage,
    pub entry_point: Cow<'static, str>,
    pub wgsl: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        stage: ShaderStage,
        entry_point: impl Into<Cow<'static, str>>,
        wgsl: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            stage,
            entry_point: entry_point.into(),
            wgsl: wgsl.into(),
        }
    }

    /// Passes the position attribute through unchanged.
    pub fn basic_vertex() -> Self {
        Self::new(
            "basic.vert",
            ShaderStage::Vertex,
            "vs_main",
            include_str!("../shaders/basic.vert.wgsl"),
        )
    }

    /// Fills every fragment with a constant orange.
    pub fn basic_fragment() -> Self {
        Self::new(
            "basic.frag",
            ShaderStage::Fragment,
            "fs_main",
            include_str!("../shaders/basic.frag.wgsl"),
        )
    }
}
