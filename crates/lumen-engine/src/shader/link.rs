use crate::error::BuildError;
use crate::geometry::VertexLayout;

use super::compile::CompiledShader;
use super::source::ShaderStage;

/// Checks that two compiled stages form a program over `layout`.
///
/// Every problem found is collected into the link log, one per line.
pub fn link(
    label: &str,
    vertex: &CompiledShader,
    fragment: &CompiledShader,
    layout: &VertexLayout,
) -> Result<(), BuildError> {
    let mut problems = Vec::new();

    if vertex.stage != ShaderStage::Vertex {
        problems.push(format!(
            "`{}` is a {} shader, expected a vertex shader",
            vertex.label, vertex.stage
        ));
    }
    if fragment.stage != ShaderStage::Fragment {
        problems.push(format!(
            "`{}` is a {} shader, expected a fragment shader",
            fragment.label, fragment.stage
        ));
    }

    for input in &vertex.inputs {
        let location = input.location;
        match layout.attribute(location) {
            None => problems.push(format!(
                "vertex input @location({location}) of `{}` is not provided by the vertex layout",
                vertex.label
            )),
            Some(attribute) if input.kind != Some(attribute.format.scalar_kind()) => {
                problems.push(format!(
                    "vertex input @location({location}) of `{}` is {input} but the layout supplies {:?}",
                    vertex.label, attribute.format
                ))
            }
            Some(_) => {}
        }
    }

    for input in &fragment.inputs {
        let location = input.location;
        match vertex.output(location) {
            None => problems.push(format!(
                "fragment input @location({location}) of `{}` is not written by `{}`",
                fragment.label, vertex.label
            )),
            Some(output) if !input.readable_from(output) => problems.push(format!(
                "fragment input @location({location}) of `{}` is {input} but `{}` writes {output}",
                fragment.label, vertex.label
            )),
            Some(_) => {}
        }
    }

    if fragment.outputs.is_empty() {
        problems.push(format!("`{}` writes no color output", fragment.label));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(BuildError::Link {
            label: label.to_string(),
            log: problems.join("\n"),
        })
    }
}
