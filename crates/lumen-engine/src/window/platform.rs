use winit::dpi::LogicalSize;

use crate::coords::FramebufferSize;
use crate::input::Key;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1920.0, 1080.0),
            resizable: true,
        }
    }
}

/// Windowing operations the frame loop depends on.
pub trait Platform {
    /// Processes pending OS events without blocking.
    fn poll_events(&mut self);

    /// Whether the user (or the application) asked for the window to close.
    fn close_requested(&self) -> bool;

    /// Marks the window as closing; takes effect after the current frame.
    fn request_close(&mut self);

    fn key_down(&self, key: Key) -> bool;

    /// Current framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> FramebufferSize;

    /// Hook invoked right before a frame is presented.
    fn pre_present(&self) {}

    /// Destroys the window and shuts the windowing layer down.
    ///
    /// Must be idempotent: calls after the first are no-ops.
    fn destroy(&mut self);
}
