use std::sync::Arc;

use crate::device::{AdapterSummary, Device, Gpu, GpuInit, ResourceCounts};
use crate::diagnostics::{Diagnostic, DiagnosticSource, DiagnosticsSink, LogSink};
use crate::error::{BuildError, Failure, SetupError};
use crate::geometry::{self, Geometry, Vertex};
use crate::paint::Color;
use crate::shader::{build_program, ShaderSource};
use crate::window::{Platform, WindowConfig, WinitPlatform};

use super::frame_loop::{FrameLoop, RunReport, Scene};

/// Everything needed to build the one scene the application draws.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub label: String,
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
    pub geometry: Geometry,
    pub clear: Color,
}

impl SceneConfig {
    /// Orange triangle on a bluish-gray background.
    pub fn triangle() -> Self {
        Self {
            label: "triangle".to_string(),
            geometry: Geometry::triangle(),
            ..Self::indexed_quad()
        }
    }

    /// Orange indexed quad on a bluish-gray background.
    pub fn indexed_quad() -> Self {
        Self {
            label: "quad".to_string(),
            vertex: ShaderSource::basic_vertex(),
            fragment: ShaderSource::basic_fragment(),
            geometry: Geometry::quad(),
            clear: Color::BLUISH_GRAY,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::indexed_quad()
    }
}

/// Builds the program and uploads the geometry.
pub fn prepare_scene<D>(
    device: &mut D,
    sink: &dyn DiagnosticsSink,
    config: &SceneConfig,
) -> Result<Scene, BuildError>
where
    D: Device + ?Sized,
{
    let program = build_program(
        device,
        sink,
        &config.label,
        &config.vertex,
        &config.fragment,
        &Vertex::layout(),
    )?;

    let mesh = geometry::upload(device, &config.geometry).map_err(|err| {
        sink.report(Diagnostic::error(DiagnosticSource::Geometry, err.to_string()));
        err
    })?;

    Ok(Scene { program, mesh })
}

/// Releases every device resource, then destroys the window.
///
/// Safe to call more than once; the second call finds nothing left to release.
pub fn teardown<P, D>(platform: &mut P, device: &mut D) -> ResourceCounts
where
    P: Platform + ?Sized,
    D: Device + ?Sized,
{
    let released = device.release_all();
    platform.destroy();
    released
}

/// Builds the scene, runs the frame loop to completion and tears down.
///
/// Teardown runs on every path, including build and frame failures.
pub fn drive<P, D>(
    platform: &mut P,
    device: &mut D,
    sink: &dyn DiagnosticsSink,
    config: &SceneConfig,
) -> Result<RunReport, Failure>
where
    P: Platform + ?Sized,
    D: Device + ?Sized,
{
    let result = prepare_scene(device, sink, config)
        .map_err(Failure::from)
        .and_then(|scene| {
            FrameLoop::new(config.clear)
                .run(platform, device, scene)
                .map_err(Failure::from)
        });

    teardown(platform, device);
    result
}

/// Application builder.
///
/// ```no_run
/// use lumen_engine::core::{Application, SceneConfig};
///
/// let ctx = Application::new().bootstrap()?;
/// let report = ctx.run(&SceneConfig::triangle())?;
/// # Ok::<(), lumen_engine::error::Failure>(())
/// ```
pub struct Application {
    window: WindowConfig,
    gpu: GpuInit,
    sink: Arc<dyn DiagnosticsSink>,
}

impl Application {
    pub fn new() -> Self {
        Self {
            window: WindowConfig::default(),
            gpu: GpuInit::default(),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    /// Replaces the default sink, which forwards diagnostics to `log`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Opens the window and acquires a device bound to it.
    ///
    /// On failure everything acquired so far is released before returning.
    pub fn bootstrap(self) -> Result<RenderContext, SetupError> {
        let mut platform = WinitPlatform::new(&self.window, self.sink.clone())?;
        let window = platform.window().ok_or(SetupError::NotResumed)?;

        let gpu = match pollster::block_on(Gpu::new(window, &self.gpu, self.sink.clone())) {
            Ok(gpu) => gpu,
            Err(err) => {
                platform.destroy();
                return Err(err);
            }
        };

        self.sink.report(gpu.adapter_summary().diagnostic());

        Ok(RenderContext {
            gpu,
            platform,
            sink: self.sink,
        })
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

/// Window plus device, ready to build and draw a scene.
pub struct RenderContext {
    // Dropped before the platform: the surface holds the window.
    gpu: Gpu,
    platform: WinitPlatform,
    sink: Arc<dyn DiagnosticsSink>,
}

impl RenderContext {
    pub fn adapter_summary(&self) -> AdapterSummary {
        self.gpu.adapter_summary()
    }

    /// Runs `config` until the window closes, then tears everything down.
    pub fn run(mut self, config: &SceneConfig) -> Result<RunReport, Failure> {
        drive(&mut self.platform, &mut self.gpu, self.sink.as_ref(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::shader::ShaderStage;
    use crate::testing::{MockDevice, MockPlatform, RecordingSink};

    #[test]
    fn happy_path_presents_then_tears_down() {
        let mut platform = MockPlatform::new(1920, 1080).closing_on_poll(3);
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();

        let report = drive(&mut platform, &mut device, &sink, &SceneConfig::indexed_quad()).unwrap();

        assert_eq!(report.frames_presented, 3);
        assert_eq!(device.release_all_calls, 1);
        assert_eq!(device.live().total(), 0);
        assert_eq!(platform.windows_destroyed, 1);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn broken_shader_fails_before_any_frame() {
        let mut platform = MockPlatform::new(800, 600);
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();

        let mut config = SceneConfig::triangle();
        config.vertex = ShaderSource::new("broken.vert", ShaderStage::Vertex, "vs_main", "fn vs_main(");

        let err = drive(&mut platform, &mut device, &sink, &config).unwrap_err();

        assert!(matches!(err, Failure::Build(BuildError::Compile { .. })));
        assert_eq!(err.exit_code(), 3);
        assert!(device.passes.is_empty());
        assert_eq!(platform.polls, 0);
        assert_eq!(device.release_all_calls, 1);
        assert_eq!(platform.windows_destroyed, 1);
        assert_eq!(sink.take()[0].source, DiagnosticSource::Shader);
    }

    #[test]
    fn invalid_geometry_releases_the_built_program() {
        let mut platform = MockPlatform::new(800, 600);
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();

        let mut config = SceneConfig::indexed_quad();
        config.geometry.indices = Some(vec![0, 1, 7]);

        let err = drive(&mut platform, &mut device, &sink, &config).unwrap_err();

        assert!(matches!(err, Failure::Build(BuildError::Geometry { .. })));
        assert_eq!(device.live().programs, 0);

        let reported = sink.take();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].source, DiagnosticSource::Geometry);
        assert_eq!(reported[0].severity, Severity::Error);
    }

    #[test]
    fn frame_failure_still_tears_down() {
        let mut platform = MockPlatform::new(800, 600);
        let mut device = MockDevice::new();
        device.fail_on_pass = Some(0);

        let err = drive(&mut platform, &mut device, &RecordingSink::default(), &SceneConfig::triangle())
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert_eq!(device.release_all_calls, 1);
        assert_eq!(platform.windows_destroyed, 1);
    }

    #[test]
    fn teardown_twice_is_harmless() {
        let mut platform = MockPlatform::new(800, 600);
        let mut device = MockDevice::new();
        prepare_scene(&mut device, &RecordingSink::default(), &SceneConfig::indexed_quad()).unwrap();

        let first = teardown(&mut platform, &mut device);
        let second = teardown(&mut platform, &mut device);

        // program + vertex buffer + index buffer + mesh
        assert_eq!(first.total(), 4);
        assert_eq!(second.total(), 0);
        assert_eq!(platform.destroy_calls, 2);
        assert_eq!(platform.windows_destroyed, 1);
    }

    #[test]
    fn prepared_scene_is_live_on_the_device() {
        let mut device = MockDevice::new();
        let scene = prepare_scene(&mut device, &RecordingSink::default(), &SceneConfig::triangle()).unwrap();

        assert!(device.has_program(scene.program));
        let mesh = device.mesh(scene.mesh).unwrap();
        assert!(mesh.index_buffer.is_none());
    }
}
