//! GPU rendering of the circle.
//!
//! - `GeometryBuffer` owns the GPU-side vertex storage of one shape.
//! - `Circle` tessellates a disc into its buffer and issues the draw.
//! - `DrawTarget` receives the bind-and-draw commands; `wgpu::RenderPass` is one.
//! - `ShaderProgram` validates a vertex/fragment WGSL pair and builds the pipeline.
//!
//! Geometry is already in NDC; shaders pass positions through unchanged.

mod buffer;
mod circle;
mod error;
mod shader;
mod target;

pub use buffer::{GeometryBuffer, HeadlessBuffer, MeshBuffer};
pub use circle::{Circle, MAX_SEGMENTS, MIN_SEGMENTS};
pub use error::{GeometryError, ShaderError, ShaderStage};
pub use shader::{
    check_program, compile_stage, link_stages, ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY,
};
pub use target::{DrawCommand, DrawRecorder, DrawTarget};
