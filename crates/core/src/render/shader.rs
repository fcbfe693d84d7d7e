//! Shader program building.
//!
//! The vertex stage is synthesized from the fragment shader's detected GLSL
//! version so both stages always declare the same `#version`. The fragment
//! shader is compiled first, then the vertex shader, then both are linked and
//! the program is made current.

use crate::error::RenderError;
use crate::gpu::{Gpu, ShaderStage};

/// Name of the single vertex attribute fed by the quad geometry.
pub const POSITION_ATTRIBUTE: &str = "vert2d";

/// Body of the pass-through vertex shader, appended after the `#version` line.
pub const VERTEX_SHADER_BODY: &str = "attribute vec2 vert2d;
void main(void) {
  gl_Position = vec4(vert2d, 0.0, 1.0);
}
";

/// Builds the vertex shader source for the given GLSL version.
pub fn vertex_shader_source(version: u32) -> String {
    format!("#version {version}\n{VERTEX_SHADER_BODY}")
}

/// Formats shader source with right-aligned line numbers followed by the
/// driver's log, so log line references can be matched against the GLSL.
///
/// Both `source` and `log` may be empty.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles one stage and returns its handle.
///
/// # Errors
///
/// `ShaderCompile` carrying the driver log when compilation fails;
/// `GraphicsApi` when any GL call fails.
pub fn compile_shader<G: Gpu>(
    gpu: &G,
    stage: ShaderStage,
    source: &str,
    source_name: Option<&str>,
) -> Result<G::Shader, RenderError> {
    let shader = gpu.create_shader(stage)?;
    gpu.shader_source(shader, source)?;
    gpu.compile_shader(shader)?;

    if gpu.shader_compile_status(shader)? {
        log::debug!("compiled {} shader", stage.name());
        return Ok(shader);
    }

    let log = gpu.shader_info_log(shader);
    log::debug!(
        "{} shader source:\n{}",
        stage.name(),
        format_shader_error(source, &log)
    );
    Err(RenderError::ShaderCompile {
        stage: stage.name(),
        source_name: source_name.map(str::to_string),
        log,
    })
}

/// Compiles the fragment shader and the synthesized vertex shader, links
/// them and makes the program current.
///
/// `fragment_name` identifies the fragment source in diagnostics.
///
/// # Errors
///
/// `ShaderCompile` for either stage, `ProgramLink` when linking fails, or
/// `GraphicsApi` when any GL call fails.
pub fn build_program<G: Gpu>(
    gpu: &G,
    fragment_source: &str,
    fragment_name: &str,
    version: u32,
) -> Result<G::Program, RenderError> {
    let program = gpu.create_program()?;

    let fragment = compile_shader(
        gpu,
        ShaderStage::Fragment,
        fragment_source,
        Some(fragment_name),
    )?;
    gpu.attach_shader(program, fragment)?;

    let vertex_source = vertex_shader_source(version);
    let vertex = compile_shader(gpu, ShaderStage::Vertex, &vertex_source, None)?;
    gpu.attach_shader(program, vertex)?;

    gpu.link_program(program)?;
    if !gpu.program_link_status(program)? {
        return Err(RenderError::ProgramLink {
            log: gpu.program_info_log(program),
        });
    }

    gpu.use_program(program)?;
    log::info!("linked shader program (GLSL {version})");
    Ok(program)
}
