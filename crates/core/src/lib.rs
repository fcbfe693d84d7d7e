#![deny(unsafe_code)]
//! Core pipeline for getimage: render one GLSL fragment shader over a
//! full-screen quad in an offscreen OpenGL context and save it as PNG.
//!
//! Provides GLSL version sniffing, the [`Gpu`] session trait and its glow
//! implementation, the render stages, PNG output, the EGL/GLFW
//! [`ContextProvider`]s and the [`pipeline`] that ties them together.

pub mod context;
pub mod error;
pub mod gpu;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod version;

#[cfg(test)]
mod testing;

pub use context::{ContextKind, ContextProvider};
pub use error::RenderError;
pub use gpu::{GlowGpu, Gpu};
pub use params::RenderParams;
pub use version::{detect_version, SUPPORTED_VERSIONS};
