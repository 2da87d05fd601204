//! Circle engine crate.
//!
//! Owns the platform + GPU runtime pieces and the circle geometry used by the
//! `moving-circle` program.

pub mod core;
pub mod device;
pub mod input;
pub mod window;

pub mod coords;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
