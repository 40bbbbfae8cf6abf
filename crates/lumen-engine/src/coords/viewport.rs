/// Framebuffer size in physical pixels, as reported by the windowing layer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FramebufferSize {
    pub width: u32,
    pub height: u32,
}

impl FramebufferSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Minimized windows report a zero-area framebuffer.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for FramebufferSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Viewport rectangle handed to the rasterizer, in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Full-framebuffer viewport `(0, 0, w, h)`.
    ///
    /// Returns `None` for a zero-area framebuffer; there is nothing to draw into.
    #[inline]
    pub fn covering(size: FramebufferSize) -> Option<Self> {
        if size.is_empty() {
            None
        } else {
            Some(Self::new(0, 0, size.width, size.height))
        }
    }

    #[inline]
    pub fn size(self) -> FramebufferSize {
        FramebufferSize::new(self.width, self.height)
    }

    /// Arguments in the order the rasterizer expects them.
    #[inline]
    pub fn as_f32(self) -> [f32; 4] {
        [self.x as f32, self.y as f32, self.width as f32, self.height as f32]
    }
}
