//! Coordinate types shared by the geometry code and the application.
//!
//! Shape positions live in normalized device coordinates (NDC):
//! - origin at the window centre
//! - +X right, +Y up
//! - visible range `[-1, 1]` on both axes
//!
//! Window sizes are kept in physical pixels.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
