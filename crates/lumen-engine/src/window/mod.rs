//! Windowing layer.
//!
//! [`Platform`] is the seam between the frame loop and the OS window; the
//! production implementation is [`WinitPlatform`], which pumps the `winit`
//! event loop once per frame instead of handing control to it.

mod platform;
mod runtime;

pub use platform::{Platform, WindowConfig};
pub use runtime::WinitPlatform;
