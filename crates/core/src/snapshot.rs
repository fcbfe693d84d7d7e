//! PNG output of a rendered RGBA8 image.

use std::path::Path;

use crate::error::RenderError;

/// Writes a top-row-first RGBA8 buffer as a PNG file.
///
/// Returns `RenderError::Encode` if the buffer does not match the
/// dimensions or the encoder fails to write the file.
pub fn write_png(rgba: Vec<u8>, width: u32, height: u32, path: &Path) -> Result<(), RenderError> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| RenderError::Encode("RGBA buffer size mismatch".into()))?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
