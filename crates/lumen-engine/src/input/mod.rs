//! Keyboard state.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The platform backend translates its events into [`InputEvent`]s.

mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
