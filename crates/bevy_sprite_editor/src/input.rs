//! Normalized input: pointer events, keyboard intents and keybindings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub kind: PointerKind,
    /// Scroll amount; negative zooms in
    pub wheel_delta: Option<f32>,
}

impl PointerEvent {
    pub fn down(position: Vec2) -> Self {
        Self {
            position,
            kind: PointerKind::Down,
            wheel_delta: None,
        }
    }

    pub fn moved(position: Vec2) -> Self {
        Self {
            position,
            kind: PointerKind::Move,
            wheel_delta: None,
        }
    }

    pub fn up(position: Vec2) -> Self {
        Self {
            position,
            kind: PointerKind::Up,
            wheel_delta: None,
        }
    }

    /// Scroll at a hover position
    pub fn wheel(position: Vec2, delta: f32) -> Self {
        Self {
            position,
            kind: PointerKind::Move,
            wheel_delta: Some(delta),
        }
    }
}

/// Keyboard action understood by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyIntent {
    ZoomIn,
    ZoomOut,
    DeleteSelected,
    ToggleTool,
}

impl KeyIntent {
    pub const ALL: [KeyIntent; 4] = [
        KeyIntent::ZoomIn,
        KeyIntent::ZoomOut,
        KeyIntent::DeleteSelected,
        KeyIntent::ToggleTool,
    ];

    /// Name used in the preferences file
    pub fn name(self) -> &'static str {
        match self {
            KeyIntent::ZoomIn => "zoom_in",
            KeyIntent::ZoomOut => "zoom_out",
            KeyIntent::DeleteSelected => "delete_selected",
            KeyIntent::ToggleTool => "toggle_tool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.name() == name)
    }

    fn default_key(self) -> KeyCode {
        match self {
            KeyIntent::ZoomIn => KeyCode::Equal,
            KeyIntent::ZoomOut => KeyCode::Minus,
            KeyIntent::DeleteSelected => KeyCode::Delete,
            KeyIntent::ToggleTool => KeyCode::Space,
        }
    }
}

/// Key to intent mapping, one key per intent
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Keybindings {
    bindings: BTreeMap<KeyIntent, KeyCode>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            bindings: KeyIntent::ALL
                .into_iter()
                .map(|intent| (intent, intent.default_key()))
                .collect(),
        }
    }
}

impl Keybindings {
    /// Defaults overridden by `intent name -> key name` entries
    ///
    /// Unknown intents or keys are skipped with a warning.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut keybindings = Self::default();
        for (intent_name, key_name) in overrides {
            let Some(intent) = KeyIntent::from_name(intent_name) else {
                warn!("Ignoring keybinding for unknown action '{}'", intent_name);
                continue;
            };
            let Some(key) = parse_key_code(key_name) else {
                warn!(
                    "Ignoring keybinding '{}' for '{}': unknown key",
                    key_name, intent_name
                );
                continue;
            };
            keybindings.bind(intent, key);
        }
        keybindings
    }

    pub fn bind(&mut self, intent: KeyIntent, key: KeyCode) {
        self.bindings.insert(intent, key);
    }

    pub fn key_for(&self, intent: KeyIntent) -> Option<KeyCode> {
        self.bindings.get(&intent).copied()
    }

    /// Intent bound to `key`; the first intent wins if several share a key
    pub fn intent_for(&self, key: KeyCode) -> Option<KeyIntent> {
        self.bindings
            .iter()
            .find(|(_, bound)| **bound == key)
            .map(|(intent, _)| *intent)
    }
}

/// Parse a key name such as `"Equal"`, `"KeyZ"`, `"z"` or `"Digit1"`
pub fn parse_key_code(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let key = match name {
        "Equal" | "=" | "+" => KeyCode::Equal,
        "Minus" | "-" => KeyCode::Minus,
        "Delete" | "Del" => KeyCode::Delete,
        "Backspace" => KeyCode::Backspace,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Escape" | "Esc" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "NumpadAdd" => KeyCode::NumpadAdd,
        "NumpadSubtract" => KeyCode::NumpadSubtract,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => {
            let rest = name.strip_prefix("Key").unwrap_or(name);
            if let Some(key) = letter_key(rest) {
                return Some(key);
            }
            let digit = name.strip_prefix("Digit").unwrap_or(name);
            return digit_key(digit);
        }
    };
    Some(key)
}

fn letter_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(match c.to_ascii_uppercase() {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        'Z' => KeyCode::KeyZ,
        _ => return None,
    })
}

fn digit_key(name: &str) -> Option<KeyCode> {
    Some(match name {
        "0" => KeyCode::Digit0,
        "1" => KeyCode::Digit1,
        "2" => KeyCode::Digit2,
        "3" => KeyCode::Digit3,
        "4" => KeyCode::Digit4,
        "5" => KeyCode::Digit5,
        "6" => KeyCode::Digit6,
        "7" => KeyCode::Digit7,
        "8" => KeyCode::Digit8,
        "9" => KeyCode::Digit9,
        _ => return None,
    })
}
