/// Initialization parameters for the GPU layer.
///
/// These are the context hints: which native APIs may back the context, what
/// kind of adapter to prefer and how frames are paced.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Native graphics APIs the instance may use.
    pub backends: wgpu::Backends,

    /// Adapter preference when several GPUs are present.
    pub power_preference: wgpu::PowerPreference,

    /// Present mode (swap behavior).
    ///
    /// FIFO is vertical sync; it is the only pacing the frame loop relies on.
    pub present_mode: wgpu::PresentMode,

    /// Prefer an sRGB surface format when available.
    ///
    /// Off by default so clear colors land in the framebuffer unconverted.
    pub prefer_srgb: bool,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::HighPerformance,
            present_mode: wgpu::PresentMode::Fifo,
            prefer_srgb: false,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
