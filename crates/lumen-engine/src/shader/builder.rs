use crate::device::{Device, ProgramId, ShaderId};
use crate::diagnostics::{Diagnostic, DiagnosticSource, DiagnosticsSink};
use crate::error::BuildError;
use crate::geometry::VertexLayout;

use super::source::ShaderSource;

/// Compiles both stages, links them and releases the stage handles.
///
/// Stage handles are released whether linking succeeds or not. Failures are
/// reported to `sink` with the full compiler/linker log before being returned.
pub fn build_program<D>(
    device: &mut D,
    sink: &dyn DiagnosticsSink,
    label: &str,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
    layout: &VertexLayout,
) -> Result<ProgramId, BuildError>
where
    D: Device + ?Sized,
{
    let report = |err: BuildError| {
        sink.report(Diagnostic::error(DiagnosticSource::Shader, err.to_string()));
        err
    };

    let vs = device.compile_shader(vertex).map_err(report)?;
    let fs = match device.compile_shader(fragment) {
        Ok(fs) => fs,
        Err(err) => {
            device.release_shader(vs);
            return Err(report(err));
        }
    };

    let program = device.link_program(label, vs, fs, layout);
    release_stages(device, [vs, fs]);

    let program = program.map_err(report)?;
    log::info!("program `{label}` built from `{}` + `{}`", vertex.label, fragment.label);
    Ok(program)
}

fn release_stages<D: Device + ?Sized>(device: &mut D, stages: [ShaderId; 2]) {
    for stage in stages {
        device.release_shader(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::geometry::Vertex;
    use crate::shader::ShaderStage;
    use crate::testing::{MockDevice, RecordingSink};

    #[test]
    fn builds_and_releases_stages() {
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();

        let program = build_program(
            &mut device,
            &sink,
            "basic",
            &ShaderSource::basic_vertex(),
            &ShaderSource::basic_fragment(),
            &Vertex::layout(),
        )
        .unwrap();

        assert!(device.has_program(program));
        assert_eq!(device.live().shaders, 0);
        assert_eq!(device.shaders_released, 2);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn compile_failure_reports_log_and_releases_vertex_stage() {
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();
        let broken = ShaderSource::new("broken.frag", ShaderStage::Fragment, "fs_main", "fn fs_main( {");

        let err = build_program(
            &mut device,
            &sink,
            "basic",
            &ShaderSource::basic_vertex(),
            &broken,
            &Vertex::layout(),
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Compile { stage: ShaderStage::Fragment, .. }));
        assert!(!err.log().trim().is_empty());
        assert_eq!(device.live().shaders, 0);
        assert_eq!(device.live().programs, 0);

        let reported = sink.take();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].severity, Severity::Error);
        assert_eq!(reported[0].source, DiagnosticSource::Shader);
        assert!(reported[0].message.contains("broken.frag"));
    }

    #[test]
    fn link_failure_still_releases_both_stages() {
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();
        let no_attributes = VertexLayout { stride: 12, attributes: Vec::new() };

        let err = build_program(
            &mut device,
            &sink,
            "basic",
            &ShaderSource::basic_vertex(),
            &ShaderSource::basic_fragment(),
            &no_attributes,
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Link { .. }));
        assert_eq!(device.shaders_released, 2);
        assert_eq!(device.live().shaders, 0);
        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn integer_input_over_float_layout_is_rejected() {
        let mut device = MockDevice::new();
        let sink = RecordingSink::default();
        let unsigned = ShaderSource::new(
            "unsigned.vert",
            ShaderStage::Vertex,
            "vs_main",
            "@vertex fn vs_main(@location(0) p: vec3<u32>) -> @builtin(position) vec4<f32> {
                 return vec4<f32>(vec3<f32>(p), 1.0);
             }",
        );

        let err = build_program(
            &mut device,
            &sink,
            "unsigned",
            &unsigned,
            &ShaderSource::basic_fragment(),
            &Vertex::layout(),
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Link { .. }));
        assert!(err.log().contains("vec3<u32>"));
        assert_eq!(device.live().programs, 0);
        assert_eq!(device.live().shaders, 0);
        assert_eq!(sink.take().len(), 1);
    }
}
