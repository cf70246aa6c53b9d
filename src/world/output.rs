//! Framebuffer image output

use std::path::Path;

use image::{imageops, DynamicImage, RgbaImage};

use crate::rasterizer::Framebuffer;

/// Copy the framebuffer into an RGBA image.
/// With `flip_vertical`, framebuffer row 0 becomes the bottom image row.
pub fn framebuffer_to_image(fb: &Framebuffer, flip_vertical: bool) -> Option<RgbaImage> {
    let mut img = RgbaImage::from_raw(fb.width as u32, fb.height as u32, fb.pixels.clone())?;
    if flip_vertical {
        imageops::flip_vertical_in_place(&mut img);
    }
    Some(img)
}

/// Write the framebuffer to disk; the format follows the file extension
pub fn save_framebuffer<P: AsRef<Path>>(
    fb: &Framebuffer,
    path: P,
    flip_vertical: bool,
) -> Result<(), image::ImageError> {
    let img = framebuffer_to_image(fb, flip_vertical).ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        ))
    })?;

    // Alpha is dropped so every enabled format (including JPEG) accepts it
    DynamicImage::ImageRgba8(img).to_rgb8().save(path)
}
