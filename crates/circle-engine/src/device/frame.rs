/// A single acquired swapchain frame.
///
/// Dropping the surface texture after submission presents the frame, so this
/// must not be held across loop iterations.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
