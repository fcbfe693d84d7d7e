//! Error types for the getimage pipeline.
//!
//! Every stage returns a [`RenderError`]; nothing below the CLI terminates the
//! process. The CLI's top-level handler turns the error into a diagnostic line
//! and an exit code.

use thiserror::Error;

/// Errors produced by any stage of the shader-to-PNG pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Bad, missing or extra command-line arguments, or unusable parameters.
    #[error("{0}")]
    Usage(String),

    /// The fragment shader file could not be read.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The shader has no line terminator or no `#version` on its first line.
    #[error("malformed shader: {0}")]
    MalformedShader(String),

    /// The first line names no supported GLSL version.
    #[error("cannot find a supported GLSL version in first line of fragment shader: ``{line}''")]
    UnsupportedVersion { line: String },

    /// The context backend failed to create a display, context or surface.
    #[error("context initialization failed ({backend}): {reason}")]
    ContextInit {
        backend: &'static str,
        reason: String,
    },

    /// A shader stage failed to compile.
    ///
    /// `source_name` is `None` for the synthesized vertex shader.
    #[error("{stage} shader compilation failed{}", source_suffix(.source_name))]
    ShaderCompile {
        stage: &'static str,
        source_name: Option<String>,
        log: String,
    },

    /// The program failed to link.
    #[error("glLinkProgram() failed")]
    ProgramLink { log: String },

    /// A vertex attribute is absent from the linked program.
    #[error("cannot get location of vertex attribute `{0}`")]
    AttributeNotFound(String),

    /// A GL call left a non-zero error code behind.
    #[error("OpenGL error: {call}(): {}", error_label(.code))]
    GraphicsApi { call: &'static str, code: u32 },

    /// The PNG encoder rejected the image or could not write it.
    #[error("png encoder: {0}")]
    Encode(String),
}

impl RenderError {
    /// Name of the pipeline stage that raised the error.
    pub fn stage(&self) -> &'static str {
        match self {
            RenderError::Usage(_) => "parse_args",
            RenderError::FileNotFound { .. } => "read_shader",
            RenderError::MalformedShader(_) | RenderError::UnsupportedVersion { .. } => {
                "detect_version"
            }
            RenderError::ContextInit { .. } => "init_context",
            RenderError::ShaderCompile { .. } | RenderError::ProgramLink { .. } => "build_program",
            RenderError::AttributeNotFound(_) => "draw_quad",
            RenderError::GraphicsApi { .. } => "gl_call",
            RenderError::Encode(_) => "write_png",
        }
    }

    /// Info log reported by the GLSL compiler or linker, if any.
    pub fn driver_log(&self) -> Option<&str> {
        match self {
            RenderError::ShaderCompile { log, .. } | RenderError::ProgramLink { log } => {
                Some(log.as_str())
            }
            _ => None,
        }
    }
}

fn source_suffix(name: &Option<String>) -> String {
    name.as_ref().map(|n| format!(" ({n})")).unwrap_or_default()
}

fn error_label(code: &u32) -> String {
    gl_error_name(*code)
}

/// Returns the symbolic name of a `glGetError` code.
pub fn gl_error_name(code: u32) -> String {
    let name = match code {
        0x0500 => "GL_INVALID_ENUM",
        0x0501 => "GL_INVALID_VALUE",
        0x0502 => "GL_INVALID_OPERATION",
        0x0503 => "GL_STACK_OVERFLOW",
        0x0504 => "GL_STACK_UNDERFLOW",
        0x0505 => "GL_OUT_OF_MEMORY",
        0x0506 => "GL_INVALID_FRAMEBUFFER_OPERATION",
        other => return format!("unknown GL error 0x{other:04X}"),
    };
    name.to_string()
}
