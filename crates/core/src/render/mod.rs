//! OpenGL render stages.
//!
//! Each stage takes the [`Gpu`](crate::gpu::Gpu) session explicitly, so the
//! bound program, buffers and framebuffer are never hidden global state from
//! the caller's point of view.
//!
//! # Module overview
//!
//! - [`shader`] -- Vertex shader synthesis, compilation and linking.
//! - [`quad`] -- Full-screen quad geometry and the single draw call.
//! - [`target`] -- Offscreen RGBA8 framebuffer the quad is drawn into.
//! - [`readback`] -- Pixel readback and the bottom-up to top-down row flip.

pub mod quad;
pub mod readback;
pub mod shader;
pub mod target;

pub use quad::{draw_quad, QUAD_INDICES, QUAD_VERTICES};
pub use readback::{flip_rows, read_image};
pub use shader::{build_program, compile_shader, format_shader_error, vertex_shader_source};
pub use target::RenderTarget;
