//! OpenGL context providers.
//!
//! A provider creates a current GL context, hands out the [`Gpu`] session
//! bound to it, offers a backend-specific sync point after drawing, and is
//! torn down exactly once by consuming it. Backends are cargo features:
//!
//! - `egl` -- surfaceless EGL context on the first EGL device (default).
//! - `glfw` -- hidden GLFW window.
//!
//! Which compiled-in backend to use is chosen at run time via
//! [`ContextKind`].

#[cfg(feature = "egl")]
mod egl;
#[cfg(feature = "glfw")]
mod glfw_window;

#[cfg(feature = "egl")]
pub use egl::EglContext;
#[cfg(feature = "glfw")]
pub use glfw_window::GlfwContext;

use crate::error::RenderError;
use crate::gpu::Gpu;
use crate::params::RenderParams;

/// A windowing backend that owns a current OpenGL context.
pub trait ContextProvider: Sized {
    /// The GL session bound to this context.
    type Gpu: Gpu;

    /// Backend name used in diagnostics.
    const NAME: &'static str;

    /// Creates a context with a surface of at least `params.width` by
    /// `params.height` and makes it current on this thread.
    ///
    /// # Errors
    ///
    /// `ContextInit` when the display, context or surface cannot be created.
    fn init(params: &RenderParams) -> Result<Self, RenderError>;

    /// Returns the GL session for this context.
    fn gpu(&self) -> &Self::Gpu;

    /// Synchronizes after drawing (swap or finish, depending on backend).
    fn render(&mut self) -> Result<(), RenderError>;

    /// Releases every native resource held by the context.
    fn terminate(self);
}

/// Names every context backend, whether or not it was compiled in.
const CONTEXT_NAMES: &[&str] = &["egl", "glfw"];

/// Selects the context backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Egl,
    Glfw,
}

impl ContextKind {
    /// Parses a backend name (`egl` or `glfw`).
    ///
    /// # Errors
    ///
    /// `Usage` for any other name.
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        match name {
            "egl" => Ok(ContextKind::Egl),
            "glfw" => Ok(ContextKind::Glfw),
            _ => Err(RenderError::Usage(format!(
                "unknown context backend '{name}' (expected one of: {})",
                CONTEXT_NAMES.join(", ")
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContextKind::Egl => "egl",
            ContextKind::Glfw => "glfw",
        }
    }

    /// Whether this backend was compiled into the crate.
    pub fn is_available(self) -> bool {
        match self {
            ContextKind::Egl => cfg!(feature = "egl"),
            ContextKind::Glfw => cfg!(feature = "glfw"),
        }
    }

    /// Returns a slice of all backend names.
    pub fn list_names() -> &'static [&'static str] {
        CONTEXT_NAMES
    }
}

impl Default for ContextKind {
    /// The first compiled-in backend, EGL first.
    fn default() -> Self {
        if ContextKind::Egl.is_available() || !ContextKind::Glfw.is_available() {
            ContextKind::Egl
        } else {
            ContextKind::Glfw
        }
    }
}
