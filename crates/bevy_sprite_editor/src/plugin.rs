//! Bevy integration: the session resource, input messages and preview driving

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::input::{KeyIntent, Keybindings, PointerEvent};
use crate::preferences::EditorPreferences;
use crate::session::{EditorMode, EditorSession};

/// Pointer event for the session (sent via MessageWriter, read via MessageReader)
#[derive(Message, Debug, Clone, Copy)]
pub struct PointerMessage(pub PointerEvent);

/// Keyboard intent for the session
#[derive(Message, Debug, Clone, Copy)]
pub struct KeyIntentMessage(pub KeyIntent);

/// Start or stop the animation preview
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMessage {
    Start,
    Stop,
}

/// Sent when session state changed and the view should be redrawn
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RedrawRequested;

/// Inserts an [`EditorSession`] and applies input messages to it
///
/// Preferences are read from disk unless an [`EditorPreferences`] resource
/// is already present.
#[derive(Default)]
pub struct EditorPlugin {
    pub mode: Option<EditorMode>,
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let existing = app.world().get_resource::<EditorPreferences>().cloned();
        let preferences = match existing {
            Some(preferences) => preferences,
            None => {
                let preferences = EditorPreferences::load();
                app.insert_resource(preferences.clone());
                preferences
            }
        };

        if !app.world().contains_resource::<EditorSession>() {
            let mode = self.mode.clone().unwrap_or_else(EditorMode::asset);
            app.insert_resource(EditorSession::from_preferences(&preferences, mode));
        }

        app.insert_resource(Keybindings::with_overrides(&preferences.keybindings))
            .add_message::<PointerMessage>()
            .add_message::<KeyIntentMessage>()
            .add_message::<PreviewMessage>()
            .add_message::<RedrawRequested>()
            .add_systems(
                Update,
                (
                    apply_pointer_messages,
                    apply_key_intents,
                    apply_preview_messages,
                    advance_preview,
                )
                    .chain(),
            );
    }
}

/// Feeds window input into [`EditorPlugin`] as messages
///
/// Requires the window and input plugins.
pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (sync_viewport, emit_pointer_messages, emit_key_intents)
                .after(bevy::input::InputSystems),
        );
    }
}

fn apply_pointer_messages(
    mut pointer_events: MessageReader<PointerMessage>,
    mut session: ResMut<EditorSession>,
    mut redraw: MessageWriter<RedrawRequested>,
) {
    let mut changed = false;
    for PointerMessage(event) in pointer_events.read() {
        changed |= session.handle_pointer(*event);
    }
    if changed {
        redraw.write(RedrawRequested);
    }
}

fn apply_key_intents(
    mut intents: MessageReader<KeyIntentMessage>,
    mut session: ResMut<EditorSession>,
    mut redraw: MessageWriter<RedrawRequested>,
) {
    let mut changed = false;
    for KeyIntentMessage(intent) in intents.read() {
        changed |= session.apply_intent(*intent);
    }
    if changed {
        redraw.write(RedrawRequested);
    }
}

fn apply_preview_messages(
    mut messages: MessageReader<PreviewMessage>,
    mut session: ResMut<EditorSession>,
    time: Res<Time>,
    mut redraw: MessageWriter<RedrawRequested>,
) {
    for message in messages.read() {
        match message {
            PreviewMessage::Start => {
                if session.start_preview(time.elapsed_secs_f64() * 1000.0) {
                    redraw.write(RedrawRequested);
                }
            }
            PreviewMessage::Stop => {
                if session.is_previewing() {
                    session.stop_preview();
                    redraw.write(RedrawRequested);
                }
            }
        }
    }
}

/// Steps the preview once per frame; a stopped preview is never advanced
fn advance_preview(
    mut session: ResMut<EditorSession>,
    time: Res<Time>,
    mut redraw: MessageWriter<RedrawRequested>,
) {
    if !session.is_previewing() {
        return;
    }
    if session.advance_playback(time.elapsed_secs_f64() * 1000.0) {
        redraw.write(RedrawRequested);
    }
}

fn sync_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<EditorSession>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if session.viewport_size() != size {
        session.set_viewport_size(size);
    }
}

fn emit_pointer_messages(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut wheel: MessageReader<MouseWheel>,
    mut last_position: Local<Option<Vec2>>,
    mut pointer_events: MessageWriter<PointerMessage>,
) {
    // Wheel y grows when scrolling up, which zooms in
    let wheel_delta: f32 = wheel.read().map(|event| -event.y).sum();

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(position) = window.cursor_position() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        pointer_events.write(PointerMessage(PointerEvent::down(position)));
    } else if *last_position != Some(position) {
        pointer_events.write(PointerMessage(PointerEvent::moved(position)));
    }
    if buttons.just_released(MouseButton::Left) {
        pointer_events.write(PointerMessage(PointerEvent::up(position)));
    }
    if wheel_delta != 0.0 {
        pointer_events.write(PointerMessage(PointerEvent::wheel(position, wheel_delta)));
    }
    *last_position = Some(position);
}

fn emit_key_intents(
    keys: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut intents: MessageWriter<KeyIntentMessage>,
) {
    for key in keys.get_just_pressed() {
        if let Some(intent) = keybindings.intent_for(*key) {
            intents.write(KeyIntentMessage(intent));
        }
    }
}
