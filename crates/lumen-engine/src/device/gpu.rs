use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::coords::FramebufferSize;
use crate::diagnostics::{Diagnostic, DiagnosticSource, DiagnosticsSink};
use crate::error::{BuildError, FrameError, SetupError};
use crate::geometry::{DrawCall, Mesh, VertexLayout};
use crate::shader::{self, CompiledShader, ShaderSource};

use super::arena::{BufferId, MeshId, ProgramId, ResourceArena, ResourceCounts, ShaderId};
use super::frame::{FrameOutcome, FramePass};
use super::init::GpuInit;
use super::surface::{self, SurfaceErrorAction};
use super::{BufferUsage, Device};

/// Shader stage as held by the GPU arena.
struct GpuShader {
    compiled: CompiledShader,
    module: wgpu::ShaderModule,
}

/// Human-readable identification of the selected adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSummary {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
}

impl AdapterSummary {
    fn from_info(info: &wgpu::AdapterInfo) -> Self {
        let version = if info.driver_info.is_empty() {
            format!("{:?} ({})", info.backend, info.driver)
        } else {
            format!("{:?} ({} {})", info.backend, info.driver, info.driver_info)
        };

        Self {
            vendor: vendor_name(info.vendor),
            renderer: info.name.clone(),
            version,
        }
    }

    /// Informational diagnostic announcing the adapter.
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::info(
            DiagnosticSource::Graphics,
            format!("graphics ready: {} / {} ({})", self.vendor, self.renderer, self.version),
        )
    }
}

/// Maps a PCI vendor id onto the vendor's name.
fn vendor_name(id: u32) -> String {
    let name = match id {
        0x10de => "NVIDIA",
        0x1002 | 0x1022 => "AMD",
        0x8086 => "Intel",
        0x106b => "Apple",
        0x13b5 => "ARM",
        0x5143 => "Qualcomm",
        0x1010 => "Imagination Technologies",
        0x10005 => "Mesa",
        0 => return "unknown".to_string(),
        _ => return format!("{id:#06x}"),
    };
    name.to_string()
}

/// Owns wgpu core objects, the surface configuration and every resource
/// created through [`Device`].
///
/// The surface holds its own reference to the window; [`Device::release_all`]
/// drops it so the window can be destroyed afterwards.
pub struct Gpu {
    /// Surface bound to the window. `None` after release.
    surface: Option<wgpu::Surface<'static>>,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current framebuffer size in physical pixels.
    size: FramebufferSize,

    resources: ResourceArena<GpuShader, wgpu::RenderPipeline, wgpu::Buffer>,

    sink: Arc<dyn DiagnosticsSink>,
}

impl Gpu {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(
        window: Arc<Window>,
        init: &GpuInit,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self, SetupError> {
        let size = FramebufferSize::from(window.inner_size());
        if size.is_empty() {
            return Err(SetupError::ZeroSizedWindow);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(SetupError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SetupError::Adapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SetupError::Device(e.to_string()))?;

        // Validation errors outside an error scope would otherwise panic.
        let error_sink = Arc::clone(&sink);
        let handler: Box<dyn wgpu::UncapturedErrorHandler> = Box::new(move |err: wgpu::Error| {
            error_sink.report(Diagnostic::warning(DiagnosticSource::Graphics, err.to_string()));
        });
        device.on_uncaptured_error(handler.into());

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(SetupError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::choose_present_mode(&caps.present_modes, init.present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        log::info!(
            "surface configured: {:?} {}x{} {:?}",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Self {
            surface: Some(surface),
            adapter,
            device,
            queue,
            config,
            size,
            resources: ResourceArena::new(),
            sink,
        })
    }

    pub fn adapter_summary(&self) -> AdapterSummary {
        AdapterSummary::from_info(&self.adapter.get_info())
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current framebuffer size (physical pixels).
    pub fn size(&self) -> FramebufferSize {
        self.size
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: FramebufferSize) {
        let Some(surface) = self.surface.as_ref() else { return };
        surface::apply_resize(surface, &self.device, &mut self.config, &mut self.size, new_size);
        log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
    }

    fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>, FrameError> {
        let Some(surface) = self.surface.as_ref() else {
            return Ok(None);
        };

        let err = match surface.get_current_texture() {
            Ok(texture) => return Ok(Some(texture)),
            Err(err) => err,
        };

        match surface::map_surface_error(surface, &self.device, &self.config, self.size, &err) {
            SurfaceErrorAction::Fatal => Err(FrameError::OutOfMemory),
            action => {
                self.sink.report(Diagnostic::warning(
                    DiagnosticSource::Graphics,
                    format!("surface error `{err}`; {action:?}"),
                ));
                Ok(None)
            }
        }
    }

    fn check_pass(&self, pass: &FramePass) -> Result<(), FrameError> {
        if self.resources.program(pass.program).is_none() {
            return Err(FrameError::StaleHandle("program"));
        }
        let mesh = self
            .resources
            .mesh(pass.mesh)
            .ok_or(FrameError::StaleHandle("mesh"))?;
        let buffers_live = self.resources.buffer(mesh.vertex_buffer).is_some()
            && mesh
                .index_buffer
                .is_none_or(|id| self.resources.buffer(id).is_some());
        if !buffers_live {
            return Err(FrameError::StaleHandle("buffer"));
        }
        Ok(())
    }

    fn encode(&self, pass: &FramePass, view: &wgpu::TextureView) -> Option<wgpu::CommandBuffer> {
        let pipeline = self.resources.program(pass.program)?;
        let mesh = self.resources.mesh(pass.mesh)?;
        let vertex_buffer = self.resources.buffer(mesh.vertex_buffer)?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen frame encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(pass.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let [x, y, w, h] = pass.viewport.as_f32();
            rpass.set_viewport(x, y, w, h, 0.0, 1.0);
            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(0, vertex_buffer.slice(..));

            match (mesh.draw, mesh.index_buffer) {
                (DrawCall::Indexed { index_count }, Some(ibo)) => {
                    let index_buffer = self.resources.buffer(ibo)?;
                    rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..index_count, 0, 0..1);
                }
                (DrawCall::Arrays { vertex_count }, _) => {
                    rpass.draw(0..vertex_count, 0..1);
                }
                (DrawCall::Indexed { .. }, None) => return None,
            }
        }

        Some(encoder.finish())
    }
}

impl Device for Gpu {
    fn compile_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, BuildError> {
        let compiled = shader::compile(source)?;

        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(compiled.label.as_str()),
                source: wgpu::ShaderSource::Wgsl(compiled.wgsl.clone()),
            });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(BuildError::Compile {
                stage: compiled.stage,
                label: compiled.label,
                log: err.to_string(),
            });
        }

        log::debug!("compiled {} shader `{}`", compiled.stage, compiled.label);
        Ok(self.resources.insert_shader(GpuShader { compiled, module }))
    }

    fn link_program(
        &mut self,
        label: &str,
        vertex: ShaderId,
        fragment: ShaderId,
        layout: &VertexLayout,
    ) -> Result<ProgramId, BuildError> {
        let (Some(vs), Some(fs)) = (self.resources.shader(vertex), self.resources.shader(fragment))
        else {
            return Err(BuildError::StaleHandle("shader"));
        };

        shader::link(label, &vs.compiled, &fs.compiled, layout)?;

        let attributes: Vec<wgpu::VertexAttribute> = layout
            .attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: a.format.to_wgpu(),
                offset: a.offset,
                shader_location: a.location,
            })
            .collect();

        // Anything the interface check missed surfaces here instead of at draw time.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs.module,
                entry_point: Some(vs.compiled.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: layout.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs.module,
                entry_point: Some(fs.compiled.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(BuildError::Link {
                label: label.to_string(),
                log: err.to_string(),
            });
        }

        log::debug!("linked program `{label}`");
        Ok(self.resources.insert_program(pipeline))
    }

    fn release_shader(&mut self, shader: ShaderId) {
        if let Some(released) = self.resources.remove_shader(shader) {
            log::trace!("released {} shader `{}`", released.compiled.stage, released.compiled.label);
        }
    }

    fn create_buffer(&mut self, label: &str, usage: BufferUsage, contents: &[u8]) -> BufferId {
        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        });

        self.resources.insert_buffer(buffer)
    }

    fn buffer_len(&self, buffer: BufferId) -> Option<u64> {
        self.resources.buffer(buffer).map(wgpu::Buffer::size)
    }

    fn create_mesh(&mut self, mesh: Mesh) -> Result<MeshId, BuildError> {
        self.resources.insert_mesh(mesh)
    }

    fn render(&mut self, pass: &FramePass) -> Result<FrameOutcome, FrameError> {
        if self.surface.is_none() {
            return Ok(FrameOutcome::Skipped);
        }
        self.check_pass(pass)?;

        if pass.viewport.size() != self.size {
            self.resize(pass.viewport.size());
        }

        let Some(surface_texture) = self.acquire()? else {
            return Ok(FrameOutcome::Skipped);
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let commands = self
            .encode(pass, &view)
            .ok_or(FrameError::StaleHandle("mesh"))?;

        self.queue.submit(std::iter::once(commands));
        drop(view);
        surface_texture.present();

        Ok(FrameOutcome::Presented)
    }

    fn release_all(&mut self) -> ResourceCounts {
        let released = self.resources.release_all();
        if released.total() > 0 {
            log::debug!(
                "released {} programs, {} buffers, {} meshes, {} shaders",
                released.programs,
                released.buffers,
                released.meshes,
                released.shaders
            );
        }
        if self.surface.take().is_some() {
            log::debug!("surface released");
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    #[test]
    fn known_vendors_are_named() {
        assert_eq!(vendor_name(0x10de), "NVIDIA");
        assert_eq!(vendor_name(0x1002), "AMD");
        assert_eq!(vendor_name(0x8086), "Intel");
    }

    #[test]
    fn summary_is_announced_as_info() {
        let summary = AdapterSummary {
            vendor: "NVIDIA".to_string(),
            renderer: "GeForce".to_string(),
            version: "Vulkan (550.1)".to_string(),
        };

        let diagnostic = summary.diagnostic();
        assert_eq!(diagnostic.severity, Severity::Info);
        assert_eq!(diagnostic.source, DiagnosticSource::Graphics);
        assert_eq!(
            diagnostic.to_string(),
            "[graphics] graphics ready: NVIDIA / GeForce (Vulkan (550.1))"
        );
    }

    #[test]
    fn unknown_vendor_is_hex() {
        assert_eq!(vendor_name(0xabcd), "0xabcd");
        assert_eq!(vendor_name(0), "unknown");
    }
}
