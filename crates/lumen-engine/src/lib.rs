//! Lumen engine crate.
//!
//! Opens a window, brings up a wgpu device bound to it, builds a shader
//! program, uploads geometry and draws it every frame until the window closes.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod shader;

#[cfg(test)]
mod testing;
