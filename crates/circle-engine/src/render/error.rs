use std::fmt;

use thiserror::Error;

/// Errors raised while building or uploading shape geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("segment count must be in {min}..={max}, got {got}")]
    InvalidSegments { got: u32, min: u32, max: u32 },

    #[error("radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    #[error("center must be finite, got ({x}, {y})")]
    InvalidCenter { x: f32, y: f32 },

    /// The vertex list does not fill the buffer it is uploaded to. The draw
    /// indices assume a full buffer, so this is unrecoverable for the shape.
    #[error("vertex upload of {actual} vertices does not match buffer capacity {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Pipeline stage a shader diagnostic belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("VERTEX"),
            ShaderStage::Fragment => f.write_str("FRAGMENT"),
        }
    }
}

/// Shader program construction failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("PROGRAM failed to link:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    /// Stage name as reported in diagnostics (`VERTEX`, `FRAGMENT` or `PROGRAM`).
    pub fn stage_name(&self) -> String {
        match self {
            ShaderError::Compile { stage, .. } => stage.to_string(),
            ShaderError::Link { .. } => "PROGRAM".to_string(),
        }
    }

    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}
