//! Reading image dimensions for the asset boundary

use bevy_sprite_core::ImageInfo;
use std::path::Path;
use thiserror::Error;

/// Errors from probing an image file
#[derive(Debug, Error)]
pub enum ImageProbeError {
    #[error("Failed to read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image has no pixels: {0}")]
    Empty(String),
}

/// Read the pixel size of an image file without decoding its pixels
///
/// The returned reference is the path as given.
pub fn probe_image(path: &Path) -> Result<ImageInfo, ImageProbeError> {
    let (width, height) = image::image_dimensions(path)?;
    let reference = path.to_string_lossy().to_string();
    if width == 0 || height == 0 {
        return Err(ImageProbeError::Empty(reference));
    }
    Ok(ImageInfo::new(reference, width, height))
}
