use std::path::{Path, PathBuf};

use crate::core::{EnvError, RenderFrame, Result};

/// Encode a `RenderFrame::Pixels` to a PNG byte vector.
/// Requires the `image` feature; otherwise returns `EnvError::NotSupported`.
pub fn encode_png(frame: &RenderFrame) -> Result<Vec<u8>> {
    match frame {
        RenderFrame::Pixels { width, height, data } => encode_pixels_png(*width, *height, data),
        RenderFrame::Text(_) => Err(EnvError::NotSupported("Text frames cannot be encoded to PNG".into())),
    }
}

#[cfg(feature = "image")]
fn encode_pixels_png(width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    let count = (width as usize) * (height as usize);
    let color = if pixels.len() == count * 3 {
        ExtendedColorType::Rgb8
    } else if pixels.len() == count * 4 {
        ExtendedColorType::Rgba8
    } else {
        return Err(EnvError::InvalidInput(format!(
            "Pixel data length {} does not match width*height*3 or *4 ({}x{})",
            pixels.len(), width, height
        )));
    };

    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(pixels, width, height, color)
        .map_err(|e| EnvError::Other(format!("PNG encode error: {e}")))?;
    Ok(buf)
}

#[cfg(not(feature = "image"))]
fn encode_pixels_png(_width: u32, _height: u32, _pixels: &[u8]) -> Result<Vec<u8>> {
    Err(EnvError::NotSupported("PNG encoding requires the `image` feature".into()))
}

/// Save a `RenderFrame::Pixels` as a PNG file at the given path.
pub fn save_png<P: AsRef<Path>>(path: P, frame: &RenderFrame) -> Result<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes).map_err(|e| EnvError::Other(format!("Failed to write PNG: {e}")))
}

/// Save one PNG per frame into `dir` as `{prefix}_{index:03}.png`, in order.
/// Returns the written paths.
pub fn save_pngs<P: AsRef<Path>>(dir: P, prefix: &str, frames: &[RenderFrame]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let path = dir.join(format!("{prefix}_{i:03}.png"));
            save_png(&path, frame)?;
            Ok(path)
        })
        .collect()
}
