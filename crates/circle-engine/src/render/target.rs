use std::ops::Range;

/// Receiver of the bind-and-draw commands a [`GeometryBuffer`](super::GeometryBuffer)
/// records. `H` is the buffer handle type the geometry lives in.
///
/// Implemented for `wgpu::RenderPass`; [`DrawRecorder`] captures the same
/// commands in memory.
pub trait DrawTarget<H: ?Sized> {
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &H);

    /// Binds `buffer` as a `u32` index buffer.
    fn set_index_buffer(&mut self, buffer: &H);

    /// One indexed draw of a single instance.
    fn draw_indexed(&mut self, indices: Range<u32>);
}

impl DrawTarget<wgpu::Buffer> for wgpu::RenderPass<'_> {
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.slice(..));
    }

    fn set_index_buffer(&mut self, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_index_buffer(self, buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        wgpu::RenderPass::draw_indexed(self, indices, 0, 0..1);
    }
}

/// A command captured by [`DrawRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    SetVertexBuffer { slot: u32, bytes: usize },
    SetIndexBuffer { bytes: usize },
    DrawIndexed(Range<u32>),
}

/// Host-side draw target that records commands against byte buffers.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    commands: Vec<DrawCommand>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Index ranges of all recorded draws, in order.
    pub fn draws(&self) -> Vec<Range<u32>> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawIndexed(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DrawTarget<[u8]> for DrawRecorder {
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &[u8]) {
        self.commands.push(DrawCommand::SetVertexBuffer { slot, bytes: buffer.len() });
    }

    fn set_index_buffer(&mut self, buffer: &[u8]) {
        self.commands.push(DrawCommand::SetIndexBuffer { bytes: buffer.len() });
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        self.commands.push(DrawCommand::DrawIndexed(indices));
    }
}
