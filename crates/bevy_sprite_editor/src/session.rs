//! The editor session: one open document and everything editing it

use bevy::prelude::*;
use bevy_sprite_animation::{AnimationSet, Frame, PlaybackStepper};
use bevy_sprite_core::{DocumentError, ImageInfo, ImageRef, TileGrid};
use std::io::ErrorKind;
use std::path::Path;
use uuid::Uuid;

use crate::camera::{Camera, Projection, Projector, Tool};
use crate::hit_test::{anchor_at, frame_at, resize_handle_at, ResizeHandle};
use crate::input::{KeyIntent, PointerEvent, PointerKind};
use crate::interaction::{EditTarget, Gesture, Interaction, InteractionMode, PendingRect};
use crate::preferences::EditorPreferences;

/// Viewport assumed until the host reports a real one
pub const DEFAULT_VIEWPORT_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

/// Default zoom change per wheel notch or zoom key
pub const DEFAULT_ZOOM_STEP: f32 = 0.1;

/// What the session is editing
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    /// Annotating frames on a sprite sheet
    Asset { image: Option<ImageInfo> },
    /// Painting a tile grid from a palette
    Level { brush: Option<ImageRef> },
}

impl EditorMode {
    pub fn asset() -> Self {
        EditorMode::Asset { image: None }
    }

    pub fn level() -> Self {
        EditorMode::Level { brush: None }
    }

    /// Projection policy for this mode
    pub fn projection(&self) -> Projection {
        match self {
            EditorMode::Asset { image } => Projection::ImageCentered {
                image_size: image
                    .as_ref()
                    .map(|info| Vec2::from(info.size()))
                    .unwrap_or(Vec2::ZERO),
            },
            EditorMode::Level { .. } => Projection::ViewportCentered,
        }
    }

    /// Whether frame editing is possible (asset mode with a loaded image)
    pub fn has_image(&self) -> bool {
        matches!(self, EditorMode::Asset { image: Some(info) } if !info.is_empty())
    }

    /// Tool the pan toggle returns to
    pub fn primary_tool(&self) -> Tool {
        match self {
            EditorMode::Asset { .. } => Tool::Select,
            EditorMode::Level { .. } => Tool::Brush,
        }
    }
}

/// Cursor to show for the current hover position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Crosshair,
    Move,
    Grab,
    Grabbing,
    ResizeNwSe,
    ResizeNeSw,
    Paint,
}

impl From<ResizeHandle> for CursorHint {
    fn from(handle: ResizeHandle) -> Self {
        match handle {
            ResizeHandle::Nw | ResizeHandle::Se => CursorHint::ResizeNwSe,
            ResizeHandle::Ne | ResizeHandle::Sw => CursorHint::ResizeNeSw,
        }
    }
}

/// One open document with its camera, edit state and preview
///
/// All mutation goes through `&mut self`, so a session is confined to
/// whoever owns it (a Bevy resource when used through [`crate::EditorPlugin`]).
/// Methods that change what a render step would draw return `true`.
#[derive(Resource, Debug)]
pub struct EditorSession {
    id: Uuid,
    camera: Camera,
    mode: EditorMode,
    animations: AnimationSet,
    tiles: TileGrid,
    interaction: Interaction,
    playback: PlaybackStepper,
    viewport_size: Vec2,
    zoom_step: f32,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorMode::asset())
    }
}

impl EditorSession {
    pub fn new(mode: EditorMode) -> Self {
        let id = Uuid::new_v4();
        info!("Editor session {} created ({} mode)", id, mode_name(&mode));
        let mut camera = Camera::default();
        camera.active_tool = mode.primary_tool();
        Self {
            id,
            camera,
            mode,
            animations: AnimationSet::new(),
            tiles: TileGrid::new(),
            interaction: Interaction::default(),
            playback: PlaybackStepper::new(),
            viewport_size: DEFAULT_VIEWPORT_SIZE,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }

    /// New session seeded from user preferences
    pub fn from_preferences(preferences: &EditorPreferences, mode: EditorMode) -> Self {
        let mut session = Self::new(mode);
        session.camera.set_zoom(preferences.initial_zoom);
        session.camera.background_color = preferences.background_color;
        session.camera.show_grid = preferences.show_grid;
        session.zoom_step = preferences.zoom_step();
        session.animations = AnimationSet::with_default_fps(preferences.default_fps);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    /// Direct access to the animation set
    ///
    /// The selection is re-validated on every use, so edits made here cannot
    /// leave it dangling.
    pub fn animations_mut(&mut self) -> &mut AnimationSet {
        &mut self.animations
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileGrid {
        &mut self.tiles
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// Selected frame index in the current animation, if still valid
    pub fn selected_frame_index(&self) -> Option<usize> {
        self.interaction
            .selected()
            .filter(|&index| index < self.animations.current().len())
    }

    pub fn selected_frame(&self) -> Option<&Frame> {
        self.animations.current().frame(self.selected_frame_index()?)
    }

    pub fn pending_rect(&self) -> Option<PendingRect> {
        self.interaction.pending_rect()
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport_size = size;
    }

    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    /// Projector for the current camera, viewport and mode
    pub fn projector(&self) -> Projector {
        self.camera
            .projector(self.viewport_size, self.mode.projection())
    }

    pub fn screen_to_image(&self, screen: Vec2) -> Vec2 {
        self.projector().screen_to_image(screen)
    }

    pub fn image_to_screen(&self, image: Vec2) -> Vec2 {
        self.projector().image_to_screen(image)
    }

    /// Switch to annotating `image`
    pub fn load_image(&mut self, image: ImageInfo) {
        info!(
            "Session {}: loaded image {} ({}x{})",
            self.id, image.image_ref, image.width, image.height
        );
        self.interaction.cancel();
        self.interaction.select(None);
        self.mode = EditorMode::Asset { image: Some(image) };
        self.camera.active_tool = Tool::Select;
    }

    /// Switch to level painting, keeping the current tile grid
    pub fn enter_level_mode(&mut self) {
        self.interaction.cancel();
        self.interaction.select(None);
        self.mode = EditorMode::level();
        self.camera.active_tool = Tool::Brush;
    }

    /// Choose the palette image painted by the brush (level mode only)
    pub fn set_brush(&mut self, brush: Option<ImageRef>) -> bool {
        match &mut self.mode {
            EditorMode::Level { brush: current } => {
                *current = brush;
                true
            }
            EditorMode::Asset { .. } => false,
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.camera.active_tool = tool;
    }

    /// Replace the animation document
    pub fn load_animations(&mut self, animations: AnimationSet) {
        self.stop_preview();
        self.interaction.cancel();
        self.interaction.select(None);
        let default_fps = self.animations.default_fps();
        self.animations = animations;
        self.animations.set_default_fps(default_fps);
    }

    /// Replace the tile grid document
    pub fn load_tiles(&mut self, tiles: TileGrid) {
        self.interaction.cancel();
        self.tiles = tiles;
    }

    /// Load the animation document at `path` and record it as recently opened
    ///
    /// A path that no longer exists is dropped from the recent list.
    pub fn open_animations(
        &mut self,
        path: &Path,
        preferences: &mut EditorPreferences,
    ) -> Result<(), DocumentError> {
        let animations = track_recent(path, preferences, bevy_sprite_core::load_animations(path))?;
        self.load_animations(animations);
        info!("Session {}: opened animations {}", self.id, path.display());
        Ok(())
    }

    /// Write the animation set to `path` and record it as recently opened
    pub fn save_animations(
        &self,
        path: &Path,
        preferences: &mut EditorPreferences,
    ) -> Result<(), DocumentError> {
        bevy_sprite_core::save_animations(&self.animations, path)?;
        preferences.add_recent_document(path);
        info!("Session {}: saved animations {}", self.id, path.display());
        Ok(())
    }

    /// Load the tile grid document at `path` and record it as recently opened
    pub fn open_tiles(
        &mut self,
        path: &Path,
        preferences: &mut EditorPreferences,
    ) -> Result<(), DocumentError> {
        let tiles = track_recent(path, preferences, bevy_sprite_core::load_tiles(path))?;
        self.load_tiles(tiles);
        info!("Session {}: opened tiles {}", self.id, path.display());
        Ok(())
    }

    /// Write the tile grid to `path` and record it as recently opened
    pub fn save_tiles(
        &self,
        path: &Path,
        preferences: &mut EditorPreferences,
    ) -> Result<(), DocumentError> {
        bevy_sprite_core::save_tiles(&self.tiles, path)?;
        preferences.add_recent_document(path);
        info!("Session {}: saved tiles {}", self.id, path.display());
        Ok(())
    }

    fn edit_target(&mut self) -> (&mut Interaction, EditTarget<'_>) {
        (
            &mut self.interaction,
            EditTarget {
                camera: &mut self.camera,
                viewport_size: self.viewport_size,
                mode: &self.mode,
                animations: &mut self.animations,
                tiles: &mut self.tiles,
            },
        )
    }

    /// Feed one pointer event through the state machine
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let mut changed = false;
        if let Some(delta) = event.wheel_delta {
            changed |= self.on_wheel(delta);
        }
        changed |= match event.kind {
            PointerKind::Down => self.pointer_down(event.position),
            PointerKind::Move => self.pointer_move(event.position),
            PointerKind::Up => self.pointer_up(),
        };
        changed
    }

    pub fn pointer_down(&mut self, screen: Vec2) -> bool {
        // Drop a stale selection before hit-testing handles
        if self.selected_frame_index().is_none() {
            self.interaction.select(None);
        }
        let (interaction, mut target) = self.edit_target();
        interaction.pointer_down(&mut target, screen)
    }

    pub fn pointer_move(&mut self, screen: Vec2) -> bool {
        let (interaction, mut target) = self.edit_target();
        interaction.pointer_move(&mut target, screen)
    }

    /// Finish the gesture; the position of the up event is not used
    pub fn pointer_up(&mut self) -> bool {
        let before = self.animations.current().len();
        let (interaction, mut target) = self.edit_target();
        let changed = interaction.pointer_up(&mut target);
        if self.animations.current().len() > before {
            debug!(
                "Session {}: committed frame {} to '{}'",
                self.id,
                before,
                self.animations.current_name()
            );
        }
        changed
    }

    /// Zoom one step; a negative delta zooms in
    pub fn on_wheel(&mut self, delta: f32) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let step = if delta < 0.0 {
            self.zoom_step
        } else {
            -self.zoom_step
        };
        self.camera.zoom_by(step)
    }

    pub fn apply_intent(&mut self, intent: KeyIntent) -> bool {
        match intent {
            KeyIntent::ZoomIn => self.camera.zoom_by(self.zoom_step),
            KeyIntent::ZoomOut => self.camera.zoom_by(-self.zoom_step),
            KeyIntent::DeleteSelected => self.delete_selected(),
            KeyIntent::ToggleTool => {
                self.toggle_tool();
                true
            }
        }
    }

    /// Flip between the mode's primary tool and pan
    pub fn toggle_tool(&mut self) {
        self.camera.active_tool = if self.camera.active_tool == Tool::Pan {
            self.mode.primary_tool()
        } else {
            Tool::Pan
        };
    }

    /// Remove the selected frame from the current animation
    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selected_frame_index() else {
            return false;
        };
        self.interaction.cancel();
        self.interaction.select(None);
        let removed = self.animations.current_mut().remove_frame(index).is_some();
        if removed {
            debug!(
                "Session {}: deleted frame {} from '{}'",
                self.id,
                index,
                self.animations.current_name()
            );
        }
        removed
    }

    /// Make `name` the animation being edited, creating it if needed
    ///
    /// Always clears the selection and any in-flight gesture.
    pub fn set_current_animation(&mut self, name: &str) -> bool {
        self.interaction.cancel();
        self.interaction.select(None);
        if self.animations.set_current(name) {
            debug!("Session {}: switched to animation '{}'", self.id, name);
        }
        true
    }

    /// Remove an animation, clearing the selection if it was current
    pub fn remove_animation(&mut self, name: &str) -> bool {
        let was_current = self.animations.current_name() == name;
        if self.animations.remove_animation(name).is_none() {
            return false;
        }
        if was_current {
            self.interaction.cancel();
            self.interaction.select(None);
        }
        true
    }

    /// Start previewing the current animation; false if it has no frames
    pub fn start_preview(&mut self, now_ms: f64) -> bool {
        let name = self.animations.current_name().to_string();
        let started = self.playback.start(&name, now_ms, &self.animations);
        if started {
            info!("Session {}: previewing '{}'", self.id, name);
        }
        started
    }

    pub fn stop_preview(&mut self) {
        if self.playback.is_active() {
            info!("Session {}: preview stopped", self.id);
        }
        self.playback.stop();
    }

    pub fn is_previewing(&self) -> bool {
        self.playback.is_active()
    }

    /// Step the preview; true if the shown frame changed
    pub fn advance_playback(&mut self, now_ms: f64) -> bool {
        self.playback.advance(now_ms, &self.animations)
    }

    pub fn playback(&self) -> &PlaybackStepper {
        &self.playback
    }

    /// Frame currently shown by the preview
    pub fn preview_frame(&self) -> Option<&Frame> {
        self.playback.current_frame(&self.animations)
    }

    /// Cursor feedback for hovering at `screen`
    pub fn cursor_hint(&self, screen: Vec2) -> CursorHint {
        match self.interaction.gesture() {
            Gesture::Idle => {}
            Gesture::Panning { .. } | Gesture::DraggingAnchor { .. } => {
                return CursorHint::Grabbing
            }
            Gesture::Drawing { .. } => return CursorHint::Crosshair,
            Gesture::DraggingFrame { .. } => return CursorHint::Move,
            Gesture::ResizingFrame { handle, .. } => return (*handle).into(),
            Gesture::Painting => return CursorHint::Paint,
        }

        match (self.camera.active_tool, &self.mode) {
            (Tool::Pan, _) => CursorHint::Grab,
            (Tool::Brush | Tool::Eraser, EditorMode::Level { .. }) => CursorHint::Paint,
            (Tool::Select, EditorMode::Asset { .. }) if self.mode.has_image() => {
                self.select_hover_hint(screen)
            }
            _ => CursorHint::Default,
        }
    }

    fn select_hover_hint(&self, screen: Vec2) -> CursorHint {
        let projector = self.projector();
        if let Some(frame) = self.selected_frame() {
            if anchor_at(screen, frame, &projector) {
                return CursorHint::Grab;
            }
            if let Some(handle) = resize_handle_at(screen, frame, &projector) {
                return handle.into();
            }
        }
        let point = projector.screen_to_image(screen);
        if frame_at(self.animations.current().frames(), point).is_some() {
            CursorHint::Move
        } else {
            CursorHint::Crosshair
        }
    }
}

fn track_recent<T>(
    path: &Path,
    preferences: &mut EditorPreferences,
    loaded: Result<T, DocumentError>,
) -> Result<T, DocumentError> {
    match &loaded {
        Ok(_) => preferences.add_recent_document(path),
        Err(DocumentError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            warn!("Document {} is gone, forgetting it", path.display());
            preferences.remove_recent_document(path);
        }
        Err(e) => warn!("Failed to open {}: {}", path.display(), e),
    }
    loaded
}

fn mode_name(mode: &EditorMode) -> &'static str {
    match mode {
        EditorMode::Asset { .. } => "asset",
        EditorMode::Level { .. } => "level",
    }
}
