//! CPU-side shape geometry.
//!
//! Everything here is pure: vertex lists are produced as plain `Vec`s and
//! handed to a `render::GeometryBuffer` for upload.

mod fan;
mod vertex;

pub use fan::{fan_indices, fan_vertex_count, rim_offset, tessellate_fan};
pub use vertex::Vertex;
