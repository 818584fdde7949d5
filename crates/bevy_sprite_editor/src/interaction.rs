//! Pointer-driven interaction state machine
//!
//! A single pointer stream is turned into edits: panning, drawing new frames,
//! moving/resizing/re-anchoring the selected frame, and painting tiles. Every
//! drag is computed from a snapshot taken at pointer-down, never
//! incrementally, so long drags do not drift.

use bevy::prelude::*;
use bevy_sprite_animation::{AnimationSet, Frame};
use bevy_sprite_core::TileGrid;

use crate::camera::{Camera, Projector, Tool};
use crate::hit_test::{anchor_at, frame_at, resize_handle_at, to_image_point, ResizeHandle};
use crate::session::EditorMode;

/// Drawn rectangles need both extents strictly above this to be kept
pub const MIN_DRAWN_EXTENT: f32 = 2.0;

/// Rectangle being dragged out; `w`/`h` go negative when dragging up/left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PendingRect {
    /// The frame this rectangle commits to, if it is large enough
    pub fn to_frame(&self) -> Option<Frame> {
        if self.w.abs() <= MIN_DRAWN_EXTENT || self.h.abs() <= MIN_DRAWN_EXTENT {
            return None;
        }
        Some(Frame::from_corners(
            to_image_point(Vec2::new(self.x, self.y)),
            to_image_point(Vec2::new(self.x + self.w, self.y + self.h)),
        ))
    }
}

/// In-flight gesture with the data it was started from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last_screen: Vec2,
    },
    Drawing {
        start: Vec2,
        pending: PendingRect,
    },
    DraggingFrame {
        index: usize,
        start: Vec2,
        snapshot: Frame,
    },
    DraggingAnchor {
        index: usize,
        start: Vec2,
        snapshot: Frame,
    },
    ResizingFrame {
        index: usize,
        handle: ResizeHandle,
        start: Vec2,
        snapshot: Frame,
    },
    Painting,
}

/// Data-free view of [`Gesture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Panning,
    Drawing,
    DraggingFrame,
    DraggingAnchor,
    ResizingFrame,
    Painting,
}

impl Gesture {
    pub fn mode(&self) -> InteractionMode {
        match self {
            Gesture::Idle => InteractionMode::Idle,
            Gesture::Panning { .. } => InteractionMode::Panning,
            Gesture::Drawing { .. } => InteractionMode::Drawing,
            Gesture::DraggingFrame { .. } => InteractionMode::DraggingFrame,
            Gesture::DraggingAnchor { .. } => InteractionMode::DraggingAnchor,
            Gesture::ResizingFrame { .. } => InteractionMode::ResizingFrame,
            Gesture::Painting => InteractionMode::Painting,
        }
    }
}

/// Everything a gesture may read or edit
pub struct EditTarget<'a> {
    pub camera: &'a mut Camera,
    pub viewport_size: Vec2,
    pub mode: &'a EditorMode,
    pub animations: &'a mut AnimationSet,
    pub tiles: &'a mut TileGrid,
}

impl EditTarget<'_> {
    fn projector(&self) -> Projector {
        self.camera
            .projector(self.viewport_size, self.mode.projection())
    }
}

/// Transient interaction state owned by one editor session
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Gesture,
    selected: Option<usize>,
}

impl Interaction {
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn mode(&self) -> InteractionMode {
        self.gesture.mode()
    }

    /// Index of the selected frame in the current animation
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    pub fn pending_rect(&self) -> Option<PendingRect> {
        match self.gesture {
            Gesture::Drawing { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Drop the in-flight gesture without committing anything
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Start a gesture; returns true if a redraw is needed
    pub fn pointer_down(&mut self, target: &mut EditTarget, screen: Vec2) -> bool {
        match target.camera.active_tool {
            Tool::Pan => {
                self.gesture = Gesture::Panning {
                    last_screen: screen,
                };
                return false;
            }
            Tool::Brush | Tool::Eraser => {
                if !can_paint(target) {
                    return false;
                }
                self.gesture = Gesture::Painting;
                return paint_at(target, screen);
            }
            Tool::Select => {}
        }

        if !target.mode.has_image() {
            return false;
        }

        let projector = target.projector();
        let point = projector.screen_to_image(screen);
        let frames = target.animations.current().frames();

        if let Some(index) = self.selected {
            if let Some(frame) = frames.get(index).copied() {
                if anchor_at(screen, &frame, &projector) {
                    self.gesture = Gesture::DraggingAnchor {
                        index,
                        start: point,
                        snapshot: frame,
                    };
                    return false;
                }
                if let Some(handle) = resize_handle_at(screen, &frame, &projector) {
                    self.gesture = Gesture::ResizingFrame {
                        index,
                        handle,
                        start: point,
                        snapshot: frame,
                    };
                    return false;
                }
            }
        }

        if let Some(index) = frame_at(frames, point) {
            let snapshot = frames[index];
            self.selected = Some(index);
            self.gesture = Gesture::DraggingFrame {
                index,
                start: point,
                snapshot,
            };
            return true;
        }

        self.selected = None;
        self.gesture = Gesture::Drawing {
            start: point,
            pending: PendingRect {
                x: point.x,
                y: point.y,
                w: 0.0,
                h: 0.0,
            },
        };
        true
    }

    /// Continue the current gesture; returns true if a redraw is needed
    pub fn pointer_move(&mut self, target: &mut EditTarget, screen: Vec2) -> bool {
        let point = target.projector().screen_to_image(screen);
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Panning { last_screen } => {
                let delta = screen - last_screen;
                target.camera.pan_by(delta);
                self.gesture = Gesture::Panning {
                    last_screen: screen,
                };
                delta != Vec2::ZERO
            }
            Gesture::Drawing { start, .. } => {
                self.gesture = Gesture::Drawing {
                    start,
                    pending: PendingRect {
                        x: start.x,
                        y: start.y,
                        w: point.x - start.x,
                        h: point.y - start.y,
                    },
                };
                true
            }
            Gesture::DraggingFrame {
                index,
                start,
                snapshot,
            } => {
                let [dx, dy] = to_image_point(point - start);
                let mut moved = snapshot;
                moved.x = snapshot.x + dx;
                moved.y = snapshot.y + dy;
                target.animations.current_mut().replace_frame(index, moved)
            }
            Gesture::DraggingAnchor {
                index,
                start,
                snapshot,
            } => {
                let [dx, dy] = to_image_point(point - start);
                let mut moved = snapshot;
                moved.anchor.x = snapshot.anchor.x + dx;
                moved.anchor.y = snapshot.anchor.y + dy;
                target.animations.current_mut().replace_frame(index, moved)
            }
            Gesture::ResizingFrame {
                index,
                handle,
                start,
                snapshot,
            } => {
                let resized = handle.resize(&snapshot, point - start);
                target
                    .animations
                    .current_mut()
                    .replace_frame(index, resized)
            }
            Gesture::Painting => paint_at(target, screen),
        }
    }

    /// Finish the current gesture
    ///
    /// A drawn rectangle large enough is appended to the current animation
    /// and selected. Returns true if a redraw is needed.
    pub fn pointer_up(&mut self, target: &mut EditTarget) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => false,
            Gesture::Drawing { pending, .. } => {
                if let Some(frame) = pending.to_frame() {
                    let index = target.animations.current_mut().append_frame(frame);
                    self.selected = Some(index);
                }
                true
            }
            _ => true,
        }
    }
}

fn can_paint(target: &EditTarget) -> bool {
    match (target.mode, target.camera.active_tool) {
        (EditorMode::Level { brush }, Tool::Brush) => brush.is_some(),
        (EditorMode::Level { .. }, Tool::Eraser) => true,
        _ => false,
    }
}

fn paint_at(target: &mut EditTarget, screen: Vec2) -> bool {
    let point = target.projector().screen_to_image(screen).to_array();
    match (target.mode, target.camera.active_tool) {
        (EditorMode::Level { brush: Some(brush) }, Tool::Brush) => target.tiles.paint(point, brush),
        (EditorMode::Level { .. }, Tool::Eraser) => target.tiles.erase(point),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_rect_normalizes_negative_extent() {
        let rect = PendingRect {
            x: 50.0,
            y: 40.0,
            w: -20.0,
            h: -10.0,
        };
        let frame = rect.to_frame().unwrap();
        assert_eq!((frame.x, frame.y, frame.w, frame.h), (30.0, 30.0, 20.0, 10.0));
        assert_eq!((frame.anchor.x, frame.anchor.y), (10.0, 10.0));
    }

    #[test]
    fn test_pending_rect_threshold() {
        let too_thin = PendingRect {
            x: 0.0,
            y: 0.0,
            w: 2.0,
            h: 50.0,
        };
        assert!(too_thin.to_frame().is_none());
        let negative_thin = PendingRect {
            x: 0.0,
            y: 0.0,
            w: 50.0,
            h: -2.0,
        };
        assert!(negative_thin.to_frame().is_none());
        let ok = PendingRect {
            x: 0.0,
            y: 0.0,
            w: 2.5,
            h: 2.5,
        };
        assert!(ok.to_frame().is_some());
    }

    #[test]
    fn test_gesture_modes() {
        assert_eq!(Gesture::default().mode(), InteractionMode::Idle);
        assert_eq!(Gesture::Painting.mode(), InteractionMode::Painting);
        assert_eq!(
            Gesture::Panning {
                last_screen: Vec2::ZERO
            }
            .mode(),
            InteractionMode::Panning
        );
    }
}
