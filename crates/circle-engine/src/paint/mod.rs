//! Colour model shared between the application and the frame renderer.

pub mod color;

pub use color::Color;
