/// Drawable size of a window in physical pixels.
///
/// The aspect ratio (`width / height`) is what shape tessellation uses to keep
/// circles round on non-square windows.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns `width / height`, or `None` for a zero-area or non-finite viewport.
    #[inline]
    pub fn aspect_ratio(self) -> Option<f32> {
        self.is_valid().then(|| self.width / self.height)
    }
}
