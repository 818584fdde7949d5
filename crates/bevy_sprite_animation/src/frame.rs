//! Frame rectangles and anchor points
//!
//! Geometry is kept in `f64` so documents load and save without losing
//! precision.

use serde::{Deserialize, Serialize};

/// Smallest width/height a frame may have
pub const MIN_FRAME_EXTENT: f64 = 1.0;

/// Pivot point of a frame, relative to the frame's own top-left corner
///
/// The anchor is not restricted to the frame rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Bottom-center of a `w` x `h` rectangle
    pub fn bottom_center(w: f64, h: f64) -> Self {
        Self { x: w / 2.0, y: h }
    }
}

/// A rectangular region of the sprite sheet plus its anchor
///
/// Coordinates are in image-space (pixels, origin at the image's top-left).
/// `w` and `h` are always at least [`MIN_FRAME_EXTENT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "FrameRecord")]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub anchor: Anchor,
}

/// Frame as found in documents; the anchor may be missing in older files
#[derive(Deserialize)]
struct FrameRecord {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default = "min_extent")]
    w: f64,
    #[serde(default = "min_extent")]
    h: f64,
    #[serde(default)]
    anchor: Option<Anchor>,
}

fn min_extent() -> f64 {
    MIN_FRAME_EXTENT
}

impl From<FrameRecord> for Frame {
    fn from(record: FrameRecord) -> Self {
        let w = clamp_extent(record.w);
        let h = clamp_extent(record.h);
        let anchor = record.anchor.unwrap_or_else(|| Anchor::bottom_center(w, h));
        Frame {
            x: finite_or_zero(record.x),
            y: finite_or_zero(record.y),
            w,
            h,
            anchor: Anchor::new(finite_or_zero(anchor.x), finite_or_zero(anchor.y)),
        }
    }
}

fn clamp_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_FRAME_EXTENT)
    } else {
        MIN_FRAME_EXTENT
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl Frame {
    /// Create a frame with the default bottom-center anchor
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let w = clamp_extent(w);
        let h = clamp_extent(h);
        Self {
            x,
            y,
            w,
            h,
            anchor: Anchor::bottom_center(w, h),
        }
    }

    /// Create a frame spanning two opposite corners, in any order
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        let x = a[0].min(b[0]);
        let y = a[1].min(b[1]);
        Self::new(x, y, (a[0] - b[0]).abs(), (a[1] - b[1]).abs())
    }

    /// Replace the anchor
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Copy of this frame with the size invariant re-established
    pub fn normalized(self) -> Self {
        Frame::from(FrameRecord {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
            anchor: Some(self.anchor),
        })
    }

    /// Set the size, clamping each extent to [`MIN_FRAME_EXTENT`]
    pub fn set_size(&mut self, w: f64, h: f64) {
        self.w = clamp_extent(w);
        self.h = clamp_extent(h);
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Inclusive point-in-rectangle test in image-space
    pub fn contains(&self, point: [f64; 2]) -> bool {
        point[0] >= self.x && point[0] <= self.right() && point[1] >= self.y && point[1] <= self.bottom()
    }

    /// The anchor expressed in image-space
    pub fn anchor_in_image(&self) -> [f64; 2] {
        [self.x + self.anchor.x, self.y + self.anchor.y]
    }

    /// Top-left corner at which to draw this frame so that its anchor lands on `pivot`
    pub fn draw_origin(&self, pivot: [f64; 2]) -> [f64; 2] {
        [pivot[0] - self.anchor.x, pivot[1] - self.anchor.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_uses_bottom_center_anchor() {
        let frame = Frame::new(4.0, 6.0, 10.0, 20.0);
        assert_eq!(frame.anchor, Anchor::new(5.0, 20.0));
        assert_eq!(frame.anchor_in_image(), [9.0, 26.0]);
    }

    #[test]
    fn test_new_frame_clamps_size() {
        let frame = Frame::new(0.0, 0.0, -3.0, 0.25);
        assert_eq!(frame.w, 1.0);
        assert_eq!(frame.h, 1.0);
    }

    #[test]
    fn test_from_corners_flips_negative_extent() {
        let frame = Frame::from_corners([30.0, 40.0], [10.0, 15.0]);
        assert_eq!((frame.x, frame.y, frame.w, frame.h), (10.0, 15.0, 20.0, 25.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let frame = Frame::new(10.0, 10.0, 5.0, 5.0);
        assert!(frame.contains([10.0, 10.0]));
        assert!(frame.contains([15.0, 15.0]));
        assert!(!frame.contains([15.1, 12.0]));
        assert!(!frame.contains([9.9, 12.0]));
    }

    #[test]
    fn test_draw_origin_places_anchor_on_pivot() {
        let frame = Frame::new(100.0, 50.0, 16.0, 32.0);
        assert_eq!(frame.draw_origin([64.0, 64.0]), [56.0, 32.0]);
    }

    #[test]
    fn test_deserialize_fills_missing_anchor_and_clamps() {
        let frame: Frame = serde_json::from_str(r#"{"x":1,"y":2,"w":0,"h":12}"#).unwrap();
        assert_eq!(frame.w, 1.0);
        assert_eq!(frame.h, 12.0);
        assert_eq!(frame.anchor, Anchor::new(0.5, 12.0));
    }

    #[test]
    fn test_anchor_outside_rectangle_is_kept() {
        let frame: Frame =
            serde_json::from_str(r#"{"x":0,"y":0,"w":8,"h":8,"anchor":{"x":-4,"y":30}}"#).unwrap();
        assert_eq!(frame.anchor, Anchor::new(-4.0, 30.0));
    }

    #[test]
    fn test_normalized_restores_invariant() {
        let mut frame = Frame::new(0.0, 0.0, 10.0, 10.0);
        frame.w = -5.0;
        frame.h = f64::NAN;
        let frame = frame.normalized();
        assert_eq!(frame.w, 1.0);
        assert_eq!(frame.h, 1.0);
    }

    #[test]
    fn test_document_geometry_is_lossless() {
        let json = r#"{"x":123.456789012,"y":0.1,"w":10.333333333333334,"h":20.5,"anchor":{"x":5.166666666666667,"y":7.25}}"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        let written = serde_json::to_value(frame).unwrap();
        let expected: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(written, expected);
        assert_eq!(frame.x, 123.456789012);
    }
}
