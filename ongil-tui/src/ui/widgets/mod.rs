//! Reusable widgets.

pub mod slider;

pub use slider::DualSlider;
