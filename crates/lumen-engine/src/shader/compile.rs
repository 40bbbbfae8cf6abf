use std::borrow::Cow;
use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, Type, TypeInner};

use crate::error::BuildError;
use crate::geometry::ScalarKind;

use super::source::{ShaderSource, ShaderStage};

/// One user-defined `@location` value crossing a stage boundary.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Varying {
    pub location: u32,
    /// `None` for types that cannot be matched against a vertex format.
    pub kind: Option<ScalarKind>,
    /// 1 for scalars, 2 to 4 for vectors.
    pub components: u32,
}

impl Varying {
    fn of(module: &Module, location: u32, ty: Handle<Type>) -> Self {
        let (scalar, components) = match module.types[ty].inner {
            TypeInner::Scalar(scalar) => (Some(scalar), 1),
            TypeInner::Vector { size, scalar } => (Some(scalar), size as u32),
            _ => (None, 0),
        };

        let kind = scalar.and_then(|s| match s.kind {
            naga::ScalarKind::Float => Some(ScalarKind::Float),
            naga::ScalarKind::Sint => Some(ScalarKind::Sint),
            naga::ScalarKind::Uint => Some(ScalarKind::Uint),
            naga::ScalarKind::Bool => Some(ScalarKind::Bool),
            naga::ScalarKind::AbstractInt | naga::ScalarKind::AbstractFloat => None,
        });

        Self {
            location,
            kind,
            components,
        }
    }

    /// Whether a stage reading `self` can consume `written`: same kind, and no
    /// more components than were written.
    pub fn readable_from(&self, written: &Varying) -> bool {
        self.kind.is_some() && self.kind == written.kind && self.components <= written.components
    }
}

impl fmt::Display for Varying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.components) {
            (Some(kind), 1) => write!(f, "{kind}"),
            (Some(kind), n) => write!(f, "vec{n}<{kind}>"),
            (None, _) => f.write_str("an unsupported type"),
        }
    }
}

/// A stage that parsed, validated and exposes the requested entry point.
///
/// Keeps the source for the backend and the entry point's interface
/// (`@location` slots) for linking.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    pub label: String,
    pub stage: ShaderStage,
    pub entry_point: String,
    pub wgsl: Cow<'static, str>,

    /// Values read by the entry point, by ascending location.
    pub inputs: Vec<Varying>,

    /// Values written by the entry point, by ascending location.
    pub outputs: Vec<Varying>,
}

impl CompiledShader {
    pub fn input(&self, location: u32) -> Option<&Varying> {
        self.inputs.iter().find(|v| v.location == location)
    }

    pub fn output(&self, location: u32) -> Option<&Varying> {
        self.outputs.iter().find(|v| v.location == location)
    }
}

/// Compiles one stage.
///
/// On failure the returned [`BuildError::Compile`] carries the full naga
/// diagnostic, rendered against the source.
pub fn compile(source: &ShaderSource) -> Result<CompiledShader, BuildError> {
    let wgsl = source.wgsl.as_ref();
    let failed = |log: String| BuildError::Compile {
        stage: source.stage,
        label: source.label.to_string(),
        log,
    };

    let module = naga::front::wgsl::parse_str(wgsl).map_err(|e| failed(e.emit_to_string(wgsl)))?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| failed(e.emit_to_string(wgsl)))?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == source.stage.to_naga() && ep.name == source.entry_point)
        .ok_or_else(|| BuildError::MissingEntryPoint {
            stage: source.stage,
            label: source.label.to_string(),
            entry_point: source.entry_point.to_string(),
        })?;

    let mut inputs: Vec<Varying> = entry
        .function
        .arguments
        .iter()
        .flat_map(|arg| varyings(&module, arg.ty, arg.binding.as_ref()))
        .collect();
    inputs.sort_unstable_by_key(|v| v.location);

    let mut outputs: Vec<Varying> = entry
        .function
        .result
        .as_ref()
        .map(|r| varyings(&module, r.ty, r.binding.as_ref()))
        .unwrap_or_default();
    outputs.sort_unstable_by_key(|v| v.location);

    Ok(CompiledShader {
        label: source.label.to_string(),
        stage: source.stage,
        entry_point: source.entry_point.to_string(),
        wgsl: source.wgsl.clone(),
        inputs,
        outputs,
    })
}

/// User-defined `@location` slots of an argument or result.
///
/// Unbound values are structs whose members carry the bindings.
fn varyings(module: &Module, ty: Handle<Type>, binding: Option<&Binding>) -> Vec<Varying> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![Varying::of(module, *location, ty)],
        Some(_) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|m| match m.binding {
                    Some(Binding::Location { location, .. }) => Some(Varying::of(module, location, m.ty)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(wgsl: &'static str) -> ShaderSource {
        ShaderSource::new("test.frag", ShaderStage::Fragment, "fs_main", wgsl)
    }

    fn locations(varyings: &[Varying]) -> Vec<u32> {
        varyings.iter().map(|v| v.location).collect()
    }

    #[test]
    fn basic_stages_compile() {
        let vs = compile(&ShaderSource::basic_vertex()).unwrap();
        assert_eq!(vs.stage, ShaderStage::Vertex);
        assert_eq!(locations(&vs.inputs), vec![0]);
        assert!(vs.outputs.is_empty());

        let fs = compile(&ShaderSource::basic_fragment()).unwrap();
        assert!(fs.inputs.is_empty());
        assert_eq!(locations(&fs.outputs), vec![0]);
    }

    #[test]
    fn syntax_error_yields_compiler_log() {
        let err = compile(&fragment("@fragment fn fs_main( -> @location(0) vec4<f32> {")).unwrap_err();

        let BuildError::Compile { stage, label, log } = &err else {
            panic!("expected a compile error, got {err:?}");
        };
        assert_eq!(*stage, ShaderStage::Fragment);
        assert_eq!(label, "test.frag");
        assert!(!log.trim().is_empty());
        assert!(!err.log().trim().is_empty());
    }

    #[test]
    fn type_error_is_a_compile_failure() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1u; }";
        assert!(matches!(compile(&fragment(src)), Err(BuildError::Compile { .. })));
    }

    #[test]
    fn wrong_entry_point_name() {
        let src = ShaderSource {
            entry_point: "main".into(),
            ..ShaderSource::basic_fragment()
        };
        let err = compile(&src).unwrap_err();
        assert!(matches!(err, BuildError::MissingEntryPoint { ref entry_point, .. } if entry_point == "main"));
    }

    #[test]
    fn entry_point_of_the_wrong_stage_is_missing() {
        let src = ShaderSource {
            stage: ShaderStage::Fragment,
            ..ShaderSource::basic_vertex()
        };
        assert!(matches!(compile(&src), Err(BuildError::MissingEntryPoint { .. })));
    }

    #[test]
    fn struct_members_contribute_locations() {
        let src = ShaderSource::new(
            "colored.vert",
            ShaderStage::Vertex,
            "vs_main",
            "struct In { @location(0) pos: vec3<f32>, @location(2) uv: vec2<f32> };
             struct Out { @builtin(position) clip: vec4<f32>, @location(1) uv: vec2<f32> };
             @vertex fn vs_main(v: In) -> Out {
                 var o: Out;
                 o.clip = vec4<f32>(v.pos, 1.0);
                 o.uv = v.uv;
                 return o;
             }",
        );
        let vs = compile(&src).unwrap();
        assert_eq!(locations(&vs.inputs), vec![0, 2]);
        assert_eq!(locations(&vs.outputs), vec![1]);
    }

    #[test]
    fn varyings_carry_their_types() {
        let vs = compile(&ShaderSource::basic_vertex()).unwrap();
        let position = vs.input(0).unwrap();
        assert_eq!(position.kind, Some(ScalarKind::Float));
        assert_eq!(position.components, 3);
        assert_eq!(position.to_string(), "vec3<f32>");

        let src = ShaderSource::new(
            "ids.vert",
            ShaderStage::Vertex,
            "vs_main",
            "@vertex fn vs_main(@location(0) id: u32, @location(1) p: vec2<i32>) -> @builtin(position) vec4<f32> {
                 return vec4<f32>(f32(id), f32(p.x), 0.0, 1.0);
             }",
        );
        let vs = compile(&src).unwrap();
        assert_eq!(vs.input(0).unwrap().to_string(), "u32");
        assert_eq!(vs.input(1).unwrap().kind, Some(ScalarKind::Sint));
        assert_eq!(vs.input(1).unwrap().components, 2);
    }
}
