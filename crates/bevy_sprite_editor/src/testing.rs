//! Test helpers for `bevy_sprite_editor` sessions.
//!
//! Session factories and gesture helpers for use in `#[cfg(test)]` modules
//! within this crate. Positions passed to `click`/`drag` are screen pixels;
//! `drag_image` takes image-space points and projects them first.
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use crate::testing::*;
//!     // ...
//! }
//! ```
#![allow(dead_code)]

use bevy::prelude::*;
use bevy_sprite_animation::Frame;
use bevy_sprite_core::{ImageInfo, ImageRef};

use crate::session::{EditorMode, EditorSession};

/// Viewport used by every test session
pub const TEST_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

// ============================================================================
// Factory Functions
// ============================================================================

/// Asset-mode session with a `width` x `height` sheet loaded, zoom 1, no pan
pub fn asset_session(width: u32, height: u32) -> EditorSession {
    let mut session = EditorSession::new(EditorMode::asset());
    session.set_viewport_size(TEST_VIEWPORT);
    session.load_image(ImageInfo::new("sheet.png", width, height));
    session
}

/// Level-mode session with an optional brush selected
pub fn level_session(brush: Option<&str>) -> EditorSession {
    let mut session = EditorSession::new(EditorMode::level());
    session.set_viewport_size(TEST_VIEWPORT);
    session.set_brush(brush.map(ImageRef::new));
    session
}

/// Append a frame to the current animation without going through gestures
pub fn add_frame(session: &mut EditorSession, frame: Frame) -> usize {
    session.animations_mut().current_mut().append_frame(frame)
}

// ============================================================================
// Gestures
// ============================================================================

/// Pointer down and up at the same screen position
pub fn click(session: &mut EditorSession, screen: Vec2) {
    session.pointer_down(screen);
    session.pointer_up();
}

/// Down at `from`, one move to `to`, then up
pub fn drag(session: &mut EditorSession, from: Vec2, to: Vec2) {
    session.pointer_down(from);
    session.pointer_move(to);
    session.pointer_up();
}

/// [`drag`] between two image-space points
pub fn drag_image(session: &mut EditorSession, from: Vec2, to: Vec2) {
    let from = session.image_to_screen(from);
    let to = session.image_to_screen(to);
    drag(session, from, to);
}
