//! PNG output for rendered frames.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};

use crate::error::{HmicError, Result};

use super::{RenderedFrame, MAX_PIXELS};

/// Build an RGBA image from a frame, upscaled by `scale` with nearest
/// neighbour so pixel edges stay sharp. A scale of 0 is treated as 1.
///
/// Fails when the scaled image would exceed [`MAX_PIXELS`].
pub fn to_image(frame: &RenderedFrame, scale: u32) -> Result<RgbaImage> {
    let (width, height) = (frame.width() as u32, frame.height() as u32);
    let img = RgbaImage::from_raw(width, height, frame.to_rgba_buffer()).ok_or_else(|| {
        HmicError::Encode {
            message: format!("Frame {} has ragged rows", frame.index),
            help: None,
        }
    })?;

    let scale = scale.max(1);
    if scale == 1 {
        return Ok(img);
    }
    let scaled = width
        .checked_mul(scale)
        .zip(height.checked_mul(scale))
        .filter(|&(w, h)| u64::from(w) * u64::from(h) <= MAX_PIXELS);
    let Some((scaled_width, scaled_height)) = scaled else {
        return Err(HmicError::Validation {
            message: format!("Scale {} is too large for a {}x{} frame", scale, width, height),
            help: Some(format!("Scaled output is limited to {} pixels", MAX_PIXELS)),
        });
    };
    Ok(imageops::resize(
        &img,
        scaled_width,
        scaled_height,
        FilterType::Nearest,
    ))
}

/// Write a rendered frame as PNG, whatever the extension of `path`.
pub fn write_png(frame: &RenderedFrame, path: &Path, scale: u32) -> Result<()> {
    to_image(frame, scale)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| HmicError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}
