//! Framebuffer readback and row flipping.
//!
//! GL returns rows bottom-up; images are stored top-down. [`flip_rows`]
//! mirrors the rows so destination row `h` holds source row `height - 1 - h`.
//! The flip is applied exactly once, in [`read_image`].

use crate::error::RenderError;
use crate::gpu::Gpu;
use crate::render::target::RenderTarget;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// Returns a copy of `data` with its rows in reverse order.
///
/// `data` holds `height` rows of `row_bytes` bytes each.
pub fn flip_rows(data: &[u8], row_bytes: usize, height: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), row_bytes * height);
    if row_bytes == 0 {
        return Vec::new();
    }
    data.chunks_exact(row_bytes)
        .rev()
        .flatten()
        .copied()
        .collect()
}

/// Reads `target` as RGBA8 and returns it top row first.
///
/// # Errors
///
/// `GraphicsApi` if binding the framebuffer or `glReadPixels` fails.
pub fn read_image<G: Gpu>(gpu: &G, target: &RenderTarget<G>) -> Result<Vec<u8>, RenderError> {
    let width = target.width() as usize;
    let height = target.height() as usize;
    let mut data = vec![0u8; width * height * CHANNELS];

    gpu.bind_framebuffer(target.framebuffer())?;
    gpu.read_pixels_rgba8(target.width() as i32, target.height() as i32, &mut data)?;
    Ok(flip_rows(&data, width * CHANNELS, height))
}
