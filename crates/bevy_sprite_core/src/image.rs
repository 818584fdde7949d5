//! Opaque image references handed out by the asset provider

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an image (a path or URL owned by the asset provider)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// An image the editor can annotate: its reference and pixel size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(rename = "imageRef")]
    pub image_ref: ImageRef,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(image_ref: impl Into<ImageRef>, width: u32, height: u32) -> Self {
        Self {
            image_ref: image_ref.into(),
            width,
            height,
        }
    }

    /// Size as `[width, height]` in image-space units
    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Whether the image has any pixels to project
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
