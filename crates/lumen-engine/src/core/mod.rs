//! Application-facing entry points.
//!
//! [`Application`] bootstraps a window and a device into a [`RenderContext`];
//! [`FrameLoop`] drives one [`Scene`] until the window closes. Both are written
//! against the [`Platform`](crate::window::Platform) and
//! [`Device`](crate::device::Device) seams so they run without a display.

mod app;
mod frame_loop;

pub use app::{drive, prepare_scene, teardown, Application, RenderContext, SceneConfig};
pub use frame_loop::{FrameLoop, LoopState, RunReport, Scene};
