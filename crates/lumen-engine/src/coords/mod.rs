//! Framebuffer and viewport geometry.
//!
//! Everything here is in physical pixels, origin top-left. The viewport always
//! covers the whole framebuffer.

mod viewport;

pub use viewport::{FramebufferSize, Viewport};
