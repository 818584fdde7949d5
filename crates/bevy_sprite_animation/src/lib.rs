//! bevy_sprite_animation - Frame and animation types for bevy_sprite_editor
//!
//! This crate provides the data model for hand-annotated sprite sheets:
//! - `Frame` - A rectangle on the sheet plus its anchor (pivot) point
//! - `Animation` - An ordered frame list with a playback rate
//! - `AnimationSet` - Named animations and the one currently being edited
//! - `PlaybackStepper` - Fixed-interval stepping decoupled from render rate
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy_sprite_animation::{AnimationSet, Frame, PlaybackStepper};
//!
//! let mut set = AnimationSet::new();
//! set.set_current("walk");
//! set.current_mut().append_frame(Frame::new(0.0, 0.0, 32.0, 32.0));
//! set.current_mut().append_frame(Frame::new(32.0, 0.0, 32.0, 32.0));
//!
//! let mut stepper = PlaybackStepper::new();
//! stepper.start("walk", 0.0, &set);
//! stepper.advance(250.0, &set); // 8 fps -> two frames later
//! ```

mod animation;
mod frame;
mod playback;

pub use animation::{Animation, AnimationSet, DEFAULT_ANIMATION_NAME, DEFAULT_FPS};
pub use frame::{Anchor, Frame, MIN_FRAME_EXTENT};
pub use playback::{PlaybackState, PlaybackStepper};
