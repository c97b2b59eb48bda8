//! Line-art conversion
//!
//! Strips color from a generated raster, producing a grayscale-with-alpha
//! PNG suitable for printing as a coloring book page.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Conversion errors
#[derive(Debug, Error)]
pub enum LineArtError {
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Convert raw raster bytes to a black-and-white PNG
///
/// Dimensions are preserved; only the colorspace changes.
pub fn to_line_art(bytes: &[u8]) -> Result<Vec<u8>, LineArtError> {
    let img = image::load_from_memory(bytes)?;
    let line_art = DynamicImage::ImageLumaA8(img.to_luma_alpha8());

    let mut buf = Cursor::new(Vec::new());
    line_art.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
