//! Camera state and screen/image projection

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor
pub const MIN_ZOOM: f32 = 0.1;
/// Largest allowed zoom factor
pub const MAX_ZOOM: f32 = 10.0;

/// Tool driving pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Select,
    Pan,
    Brush,
    Eraser,
}

/// Round to one decimal place and clamp into `[MIN_ZOOM, MAX_ZOOM]`
pub fn round_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return 1.0;
    }
    ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom, pan offset and active tool of an editor view
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    zoom: f32,
    /// Pan offset in screen pixels, unbounded
    pub pan: Vec2,
    pub active_tool: Tool,
    pub background_color: [u8; 3],
    /// Whether the renderer overlays the tile grid
    pub show_grid: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            active_tool: Tool::Select,
            background_color: [40, 40, 48],
            show_grid: true,
        }
    }
}

impl Camera {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, rounded and clamped like [`Camera::zoom_by`]
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = round_zoom(zoom);
    }

    /// Change zoom by `delta`; returns true if the zoom changed
    pub fn zoom_by(&mut self, delta: f32) -> bool {
        let zoom = round_zoom(self.zoom + delta);
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    /// Shift the view by a screen-space delta
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn background(&self) -> Color {
        let [r, g, b] = self.background_color;
        Color::srgb_u8(r, g, b)
    }

    /// Freeze the current camera into a projector for one viewport
    pub fn projector(&self, viewport_size: Vec2, projection: Projection) -> Projector {
        let center = viewport_size * 0.5 + self.pan;
        let origin = match projection {
            Projection::ImageCentered { image_size } => center - image_size * 0.5 * self.zoom,
            Projection::ViewportCentered => center,
        };
        Projector {
            origin,
            zoom: self.zoom,
        }
    }
}

/// Where image-space `(0, 0)` lands on screen
///
/// Asset editing centers the sheet on the pan point; level editing has no
/// backing image and puts the grid origin there instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    ImageCentered { image_size: Vec2 },
    ViewportCentered,
}

/// Screen/image conversion for a fixed camera and viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    /// Screen position of image-space `(0, 0)`
    pub origin: Vec2,
    pub zoom: f32,
}

impl Projector {
    pub fn screen_to_image(&self, screen: Vec2) -> Vec2 {
        (screen - self.origin) / self.zoom
    }

    pub fn image_to_screen(&self, image: Vec2) -> Vec2 {
        image * self.zoom + self.origin
    }
}
