use crate::coords::Vec2;
use crate::geometry::{fan_vertex_count, tessellate_fan};

use super::{DrawTarget, GeometryBuffer, GeometryError, MeshBuffer};

/// Smallest segment count that still encloses an area.
pub const MIN_SEGMENTS: u32 = 3;

/// Upper bound keeping `segments + 2` comfortably inside `u32` index range.
pub const MAX_SEGMENTS: u32 = 1 << 16;

/// A filled disc in NDC backed by its own geometry buffer.
///
/// The buffer stays empty until the first [`regenerate`](Self::regenerate).
/// Moving the circle is a logical update only; call `regenerate` afterwards
/// to make the change visible.
#[derive(Debug)]
pub struct Circle<B = MeshBuffer> {
    center: Vec2,
    radius: f32,
    segments: u32,
    buffer: B,
}

impl Circle<MeshBuffer> {
    /// Creates a circle with freshly allocated wgpu buffers.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        center: Vec2,
        radius: f32,
        segments: u32,
    ) -> Result<Self, GeometryError> {
        validate(center, radius, segments)?;
        let buffer = MeshBuffer::new_fan(device, queue, segments);
        Self::with_buffer(buffer, center, radius, segments)
    }
}

impl<B: GeometryBuffer> Circle<B> {
    /// Creates a circle around an existing buffer.
    ///
    /// The buffer must be sized for exactly `segments + 2` vertices.
    pub fn with_buffer(
        buffer: B,
        center: Vec2,
        radius: f32,
        segments: u32,
    ) -> Result<Self, GeometryError> {
        validate(center, radius, segments)?;

        let expected = fan_vertex_count(segments);
        if buffer.capacity() != expected {
            return Err(GeometryError::LengthMismatch {
                expected,
                actual: buffer.capacity(),
            });
        }

        Ok(Self { center, radius, segments, buffer })
    }

    /// Re-tessellates against `aspect` (`width / height`) and uploads the
    /// result, replacing the previous buffer content.
    pub fn regenerate(&mut self, aspect: f32) -> Result<(), GeometryError> {
        debug_assert!(aspect.is_finite() && aspect > 0.0, "invalid aspect ratio {aspect}");

        let vertices = tessellate_fan(self.center, self.radius, self.segments, aspect);
        self.buffer.upload(&vertices)?;

        log::trace!(
            "circle regenerated at ({:.3}, {:.3}), aspect {aspect:.3}",
            self.center.x,
            self.center.y
        );
        Ok(())
    }

    /// Adds `(dx, dy)` to the centre, then clamps each axis to `[min, max]`.
    pub fn move_by(&mut self, dx: f32, dy: f32, min: f32, max: f32) {
        self.center = (self.center + Vec2::new(dx, dy)).clamp_each(min, max);
    }

    /// Records the draw for the uploaded fan. Leaves the buffers bound on `target`.
    pub fn draw<T>(&self, target: &mut T)
    where
        T: DrawTarget<B::Handle> + ?Sized,
    {
        self.buffer.draw(target);
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }
}

fn validate(center: Vec2, radius: f32, segments: u32) -> Result<(), GeometryError> {
    if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments) {
        return Err(GeometryError::InvalidSegments {
            got: segments,
            min: MIN_SEGMENTS,
            max: MAX_SEGMENTS,
        });
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeometryError::InvalidRadius(radius));
    }
    if !center.is_finite() {
        return Err(GeometryError::InvalidCenter { x: center.x, y: center.y });
    }
    Ok(())
}
