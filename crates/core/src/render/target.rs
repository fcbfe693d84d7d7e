//! Offscreen RGBA8 render target.
//!
//! A `RenderTarget` pairs a framebuffer object with an RGBA8 colour
//! texture of exactly the requested size. The quad is drawn into it and read
//! back from it, so the result does not depend on whatever default surface
//! the context backend provides (surfaceless EGL contexts have none).

use crate::error::RenderError;
use crate::gpu::Gpu;

/// A framebuffer object with one RGBA8 colour attachment.
pub struct RenderTarget<G: Gpu> {
    framebuffer: G::Framebuffer,
    width: u32,
    height: u32,
}

impl<G: Gpu> RenderTarget<G> {
    /// Creates the texture and framebuffer, attaches them, checks
    /// completeness, and leaves the framebuffer bound for drawing and
    /// readback.
    ///
    /// # Errors
    ///
    /// `GraphicsApi` if any GL call fails or the framebuffer is incomplete.
    pub fn new(gpu: &G, width: u32, height: u32) -> Result<Self, RenderError> {
        let texture = gpu.create_rgba8_texture(width as i32, height as i32)?;
        let framebuffer = gpu.create_framebuffer()?;
        gpu.bind_framebuffer(framebuffer)?;
        gpu.attach_color_texture(texture)?;

        if !gpu.framebuffer_complete()? {
            return Err(RenderError::GraphicsApi {
                call: "glCheckFramebufferStatus",
                code: glow::INVALID_FRAMEBUFFER_OPERATION,
            });
        }

        log::debug!("offscreen target {width}x{height} ready");
        Ok(Self {
            framebuffer,
            width,
            height,
        })
    }

    /// Returns the framebuffer handle.
    pub fn framebuffer(&self) -> G::Framebuffer {
        self.framebuffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
