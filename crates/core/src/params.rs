//! Render parameters shared by every pipeline stage.

use std::path::PathBuf;

use crate::context::ContextKind;
use crate::error::RenderError;

/// Default output width and height in pixels.
pub const DEFAULT_SIZE: u32 = 256;

/// Default PNG output path.
pub const DEFAULT_OUTPUT: &str = "output.png";

/// Parameters for a single render.
///
/// Built with defaults, then `glsl_version` is filled in once the fragment
/// shader has been sniffed. Stages only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    /// Framebuffer and PNG width in pixels.
    pub width: u32,
    /// Framebuffer and PNG height in pixels.
    pub height: u32,
    /// Which backend provides the GL context.
    pub context: ContextKind,
    /// GLSL version detected from the fragment shader; 0 until sniffed.
    pub glsl_version: u32,
    /// Where the PNG is written.
    pub output: PathBuf,
}

impl RenderParams {
    /// Rejects zero dimensions and sizes GL cannot address.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::Usage(format!(
                "invalid dimensions {}x{}: width and height must be non-zero",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(RenderError::Usage(format!(
                "invalid dimensions {}x{}: too large",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            context: ContextKind::default(),
            glsl_version: 0,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}
