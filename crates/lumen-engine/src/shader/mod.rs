//! Shader program builder.
//!
//! Stages are WGSL. Compilation runs the naga front end and validator so a
//! failing stage yields the compiler's own diagnostic text; linking checks
//! that the stage interfaces and the vertex layout agree.

mod builder;
mod compile;
mod link;
mod source;

pub use builder::build_program;
pub use compile::{compile, CompiledShader, Varying};
pub use link::link;
pub use source::{ShaderSource, ShaderStage};
