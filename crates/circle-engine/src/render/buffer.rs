use wgpu::util::DeviceExt;

use crate::geometry::{fan_indices, fan_vertex_count, Vertex};

use super::{DrawTarget, GeometryError};

/// GPU-side vertex storage for one shape.
///
/// Uploads replace the whole content; there are no partial updates. Before
/// the first upload the buffer is empty and drawing it does nothing.
pub trait GeometryBuffer {
    /// Buffer handle the draw commands bind.
    type Handle: ?Sized;

    /// Number of vertices a full upload must contain.
    fn capacity(&self) -> usize;

    /// Number of vertices currently uploaded (`0` before the first upload).
    fn vertex_count(&self) -> usize;

    /// Replaces the buffer content with `vertices`.
    fn upload(&mut self, vertices: &[Vertex]) -> Result<(), GeometryError>;

    /// Binds the buffer and records one draw covering all uploaded vertices.
    fn draw<T>(&self, target: &mut T)
    where
        T: DrawTarget<Self::Handle> + ?Sized;
}

fn check_len(capacity: usize, actual: usize) -> Result<(), GeometryError> {
    if actual == capacity {
        Ok(())
    } else {
        Err(GeometryError::LengthMismatch { expected: capacity, actual })
    }
}

// ── wgpu ──────────────────────────────────────────────────────────────────

/// wgpu vertex + index buffer pair holding a triangle fan.
///
/// The index buffer is static (it only depends on the segment count) and is
/// written at construction. The vertex buffer is rewritten on every upload.
/// Both are destroyed when the `MeshBuffer` is dropped.
pub struct MeshBuffer {
    queue: wgpu::Queue,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    capacity: usize,
    uploaded: usize,
}

impl MeshBuffer {
    /// Allocates buffers for a fan with `segments` rim segments.
    pub fn new_fan(device: &wgpu::Device, queue: &wgpu::Queue, segments: u32) -> Self {
        let capacity = fan_vertex_count(segments);
        let indices = fan_indices(segments);

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("circle vbo"),
            size: (capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("circle ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("allocated fan buffers: {capacity} vertices, {} indices", indices.len());

        Self {
            queue: queue.clone(),
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            capacity,
            uploaded: 0,
        }
    }
}

impl GeometryBuffer for MeshBuffer {
    type Handle = wgpu::Buffer;

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn vertex_count(&self) -> usize {
        self.uploaded
    }

    fn upload(&mut self, vertices: &[Vertex]) -> Result<(), GeometryError> {
        check_len(self.capacity, vertices.len())?;
        self.queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        self.uploaded = vertices.len();
        Ok(())
    }

    fn draw<T>(&self, target: &mut T)
    where
        T: DrawTarget<Self::Handle> + ?Sized,
    {
        if self.uploaded == 0 {
            return;
        }
        target.set_vertex_buffer(0, &self.vertex_buffer);
        target.set_index_buffer(&self.index_buffer);
        target.draw_indexed(0..self.index_count);
    }
}

impl Drop for MeshBuffer {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        log::debug!("released fan buffers");
    }
}

// ── headless ──────────────────────────────────────────────────────────────

/// CPU-only buffer that keeps the last upload and its fan indices in memory.
///
/// Used where no GPU is available (tests, headless tools). Draws bind the
/// raw bytes, so a [`DrawRecorder`](super::DrawRecorder) sees the same
/// command sequence a render pass would.
#[derive(Debug, Default)]
pub struct HeadlessBuffer {
    capacity: usize,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    uploads: usize,
}

impl HeadlessBuffer {
    /// Creates an empty buffer sized for a fan with `segments` rim segments.
    pub fn new_fan(segments: u32) -> Self {
        Self::with_capacity(fan_vertex_count(segments))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let segments = capacity.saturating_sub(2) as u32;
        Self {
            capacity,
            indices: fan_indices(segments),
            ..Self::default()
        }
    }

    /// Vertices from the last successful upload.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of successful uploads so far.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

impl GeometryBuffer for HeadlessBuffer {
    type Handle = [u8];

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn upload(&mut self, vertices: &[Vertex]) -> Result<(), GeometryError> {
        check_len(self.capacity, vertices.len())?;
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.uploads += 1;
        Ok(())
    }

    fn draw<T>(&self, target: &mut T)
    where
        T: DrawTarget<Self::Handle> + ?Sized,
    {
        if self.vertices.is_empty() {
            return;
        }
        target.set_vertex_buffer(0, bytemuck::cast_slice(&self.vertices));
        target.set_index_buffer(bytemuck::cast_slice(&self.indices));
        target.draw_indexed(0..self.indices.len() as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, DrawRecorder};

    #[test]
    fn headless_starts_empty() {
        let buf = HeadlessBuffer::new_fan(8);
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.vertex_count(), 0);
        assert_eq!(buf.upload_count(), 0);
    }

    #[test]
    fn upload_replaces_content() {
        let mut buf = HeadlessBuffer::with_capacity(2);
        buf.upload(&[Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)]).unwrap();
        buf.upload(&[Vertex::new(0.5, 0.5), Vertex::new(-1.0, 1.0)]).unwrap();
        assert_eq!(buf.vertices(), &[Vertex::new(0.5, 0.5), Vertex::new(-1.0, 1.0)]);
        assert_eq!(buf.upload_count(), 2);
    }

    #[test]
    fn short_upload_is_rejected_and_keeps_previous_content() {
        let mut buf = HeadlessBuffer::with_capacity(3);
        let full = [Vertex::new(0.0, 0.0); 3];
        buf.upload(&full).unwrap();

        let err = buf.upload(&[Vertex::new(1.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::LengthMismatch { expected: 3, actual: 1 });
        assert_eq!(buf.vertices(), &full);
        assert_eq!(buf.upload_count(), 1);
    }

    #[test]
    fn draw_before_first_upload_records_nothing() {
        let buf = HeadlessBuffer::new_fan(8);
        let mut rec = DrawRecorder::new();
        buf.draw(&mut rec);
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn draw_binds_and_covers_whole_fan() {
        let mut buf = HeadlessBuffer::new_fan(8);
        buf.upload(&[Vertex::new(0.0, 0.0); 10]).unwrap();

        let mut rec = DrawRecorder::new();
        buf.draw(&mut rec);

        let vertex_bytes = 10 * std::mem::size_of::<Vertex>();
        assert_eq!(
            rec.commands(),
            &[
                DrawCommand::SetVertexBuffer { slot: 0, bytes: vertex_bytes },
                DrawCommand::SetIndexBuffer { bytes: 24 * 4 },
                DrawCommand::DrawIndexed(0..24),
            ]
        );
    }
}
