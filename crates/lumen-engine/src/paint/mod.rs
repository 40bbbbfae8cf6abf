//! Color model for clears and flat fills.

pub mod color;

pub use color::Color;
