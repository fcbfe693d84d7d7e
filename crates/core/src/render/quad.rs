//! Full-screen quad geometry and the single draw call.
//!
//! Two triangles cover normalized device coordinates `[-1, 1]²`. The quad is
//! drawn once: upload, clear to opaque black, draw six byte indices, flush.

use crate::error::RenderError;
use crate::gpu::{BufferTarget, Gpu};
use crate::params::RenderParams;

use super::shader::POSITION_ATTRIBUTE;

/// Quad corners as `(x, y)` pairs: top-left, bottom-left, bottom-right, top-right.
pub const QUAD_VERTICES: [f32; 8] = [
    -1.0, 1.0, //
    -1.0, -1.0, //
    1.0, -1.0, //
    1.0, 1.0,
];

/// Two counter-clockwise triangles over [`QUAD_VERTICES`].
pub const QUAD_INDICES: [u8; 6] = [0, 1, 2, 2, 3, 0];

fn vertex_bytes() -> Vec<u8> {
    QUAD_VERTICES
        .iter()
        .flat_map(|v| v.to_ne_bytes())
        .collect()
}

/// Draws the full-screen quad with `program` into the bound framebuffer.
///
/// `program` must already be current (see
/// [`build_program`](super::shader::build_program)).
///
/// # Errors
///
/// `AttributeNotFound` if `vert2d` was optimized away or misnamed;
/// `GraphicsApi` if any GL call fails.
pub fn draw_quad<G: Gpu>(
    gpu: &G,
    program: G::Program,
    params: &RenderParams,
) -> Result<(), RenderError> {
    let location = gpu
        .attrib_location(program, POSITION_ATTRIBUTE)
        .ok_or_else(|| RenderError::AttributeNotFound(POSITION_ATTRIBUTE.to_string()))?;
    gpu.enable_vertex_attrib_array(location)?;

    let vertex_buffer = gpu.create_buffer()?;
    gpu.bind_buffer(BufferTarget::Vertex, vertex_buffer)?;
    gpu.buffer_data(BufferTarget::Vertex, &vertex_bytes())?;

    let index_buffer = gpu.create_buffer()?;
    gpu.bind_buffer(BufferTarget::Index, index_buffer)?;
    gpu.buffer_data(BufferTarget::Index, &QUAD_INDICES)?;

    gpu.bind_buffer(BufferTarget::Vertex, vertex_buffer)?;
    gpu.vertex_attrib_pointer_f32(location, 2)?;
    gpu.bind_buffer(BufferTarget::Index, index_buffer)?;

    gpu.viewport(0, 0, params.width as i32, params.height as i32)?;
    gpu.clear_color(0.0, 0.0, 0.0, 1.0)?;
    gpu.clear_color_buffer()?;
    gpu.draw_triangles_u8(QUAD_INDICES.len() as i32)?;
    gpu.flush()?;

    log::debug!("drew quad at {}x{}", params.width, params.height);
    Ok(())
}
