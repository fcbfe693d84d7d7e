//! End-to-end orchestration: shader file in, PNG out.
//!
//! ```text
//! read_shader -> detect_version -> init context -> offscreen target
//!   -> build_program -> draw_quad -> context.render -> read_image
//!   -> write_png -> context.terminate
//! ```
//!
//! Any stage failure is returned immediately; there is no retry.

use std::path::Path;

use crate::context::{ContextKind, ContextProvider};
use crate::error::RenderError;
use crate::params::RenderParams;
use crate::render::{build_program, draw_quad, read_image, RenderTarget};
use crate::snapshot::write_png;
use crate::version::detect_version;

/// Reads the fragment shader at `path`.
///
/// Invalid UTF-8 is replaced rather than rejected; the GLSL compiler reports
/// anything it cannot parse.
///
/// # Errors
///
/// `FileNotFound` if the file cannot be read (including an empty path).
pub fn read_shader(path: &Path) -> Result<String, RenderError> {
    let bytes = std::fs::read(path).map_err(|e| {
        log::debug!("reading {}: {e}", path.display());
        RenderError::FileNotFound {
            path: path.display().to_string(),
        }
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Renders `fragment_source` with an already initialized context and writes
/// the PNG to `params.output`. The context is terminated on success.
///
/// `params.glsl_version` must already hold the sniffed version.
pub fn render_shader<P: ContextProvider>(
    mut context: P,
    params: &RenderParams,
    fragment_source: &str,
    fragment_name: &str,
) -> Result<(), RenderError> {
    let target = {
        let gpu = context.gpu();
        let target = RenderTarget::new(gpu, params.width, params.height)?;
        let program = build_program(gpu, fragment_source, fragment_name, params.glsl_version)?;
        draw_quad(gpu, program, params)?;
        target
    };

    context.render()?;

    let image = read_image(context.gpu(), &target)?;
    write_png(image, target.width(), target.height(), &params.output)?;

    context.terminate();
    Ok(())
}

/// Initializes backend `P` and renders with it.
pub fn render_with<P: ContextProvider>(
    params: &RenderParams,
    fragment_source: &str,
    fragment_name: &str,
) -> Result<(), RenderError> {
    log::info!("initializing {} context", P::NAME);
    let context = P::init(params)?;
    render_shader(context, params, fragment_source, fragment_name)
}

/// Dispatches to the backend selected by `params.context`.
///
/// # Errors
///
/// `ContextInit` if the selected backend was not compiled in, otherwise
/// whatever the render stages return.
pub fn render_with_selected(
    params: &RenderParams,
    fragment_source: &str,
    fragment_name: &str,
) -> Result<(), RenderError> {
    match params.context {
        #[cfg(feature = "egl")]
        ContextKind::Egl => {
            render_with::<crate::context::EglContext>(params, fragment_source, fragment_name)
        }
        #[cfg(feature = "glfw")]
        ContextKind::Glfw => {
            render_with::<crate::context::GlfwContext>(params, fragment_source, fragment_name)
        }
        #[allow(unreachable_patterns)]
        other => Err(RenderError::ContextInit {
            backend: other.name(),
            reason: "backend not compiled in".into(),
        }),
    }
}

/// Runs the whole pipeline for the shader at `shader_path`.
///
/// Fills in `params.glsl_version` once the shader has been sniffed.
pub fn run(params: &mut RenderParams, shader_path: &Path) -> Result<(), RenderError> {
    params.validate()?;

    let source = read_shader(shader_path)?;
    params.glsl_version = detect_version(&source)?;
    log::info!(
        "{}: GLSL version {}",
        shader_path.display(),
        params.glsl_version
    );

    let name = shader_path.display().to_string();
    render_with_selected(params, &source, &name)
}
