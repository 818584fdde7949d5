//! bevy_sprite_editor - Interactive sprite-sheet frame editor engine
//!
//! This crate provides the editing engine behind a sprite-sheet annotator:
//! - Camera with zoom/pan and image-centered or viewport-centered projection
//! - Hit-testing of frames, resize handles and anchors
//! - A pointer-driven state machine for drawing, moving, resizing,
//!   re-anchoring, panning and tile painting
//! - Animation preview driven by a fixed-interval stepper
//! - Persistent editor preferences
//!
//! Rendering is left to the host: it reads the [`EditorSession`] after every
//! [`RedrawRequested`] message.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_sprite_editor::{EditorPlugin, PointerInputPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins((EditorPlugin::default(), PointerInputPlugin))
//!         .run();
//! }
//! ```

pub mod camera;
pub mod input;
pub mod interaction;
pub mod preferences;
pub mod probe;
pub mod session;

mod plugin;

#[cfg(test)]
mod testing;

// Re-export the data crates
pub use bevy_sprite_animation;
pub use bevy_sprite_core;

pub use camera::{Camera, Projection, Projector, Tool};
pub use input::{KeyIntent, Keybindings, PointerEvent, PointerKind};
pub use interaction::{Gesture, InteractionMode, PendingRect};
pub use plugin::{
    EditorPlugin, KeyIntentMessage, PointerInputPlugin, PointerMessage, PreviewMessage,
    RedrawRequested,
};
pub use preferences::{EditorPreferences, PreferencesError};
pub use probe::{probe_image, ImageProbeError};
pub use session::{CursorHint, EditorMode, EditorSession};
