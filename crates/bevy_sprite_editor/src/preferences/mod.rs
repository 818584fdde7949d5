//! Editor preferences and persistent settings
//!
//! Manages user preferences stored in platform-specific config directories:
//! - Windows: %APPDATA%/bevy_sprite_editor/
//! - Linux: ~/.config/bevy_sprite_editor/
//! - macOS: ~/Library/Application Support/com.bevy_sprite_editor.bevy_sprite_editor/

use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::camera::round_zoom;
use bevy_sprite_animation::DEFAULT_FPS;

/// Maximum number of recent documents to track
pub const MAX_RECENT_DOCUMENTS: usize = 10;

/// File name inside the config directory
pub const PREFERENCES_FILE_NAME: &str = "preferences.toml";

/// Errors from reading or writing the preferences file
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to access preferences file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Editor preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Version for future migrations
    pub version: u32,

    // View, copied into each new session's camera
    pub initial_zoom: f32,
    pub zoom_step: f32,
    pub background_color: [u8; 3],
    pub show_grid: bool,

    // New animations
    pub default_fps: u32,

    // Action name -> key name, overriding the defaults
    pub keybindings: BTreeMap<String, String>,

    pub recent_documents: Vec<RecentDocument>,
}

/// A recently opened document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentDocument {
    pub path: String,
    pub name: String,
    pub last_opened: u64, // Unix timestamp
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            version: 1,
            initial_zoom: 1.0,
            zoom_step: 0.1,
            background_color: [40, 40, 48],
            show_grid: true,
            default_fps: DEFAULT_FPS,
            keybindings: BTreeMap::new(),
            recent_documents: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Path of the preferences file in the platform config directory
    pub fn config_path() -> Result<PathBuf, PreferencesError> {
        ProjectDirs::from("com", "bevy_sprite_editor", "bevy_sprite_editor")
            .map(|dirs| dirs.config_dir().join(PREFERENCES_FILE_NAME))
            .ok_or(PreferencesError::NoConfigDir)
    }

    /// Load from the config directory, falling back to defaults
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("Using default preferences: {}", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(preferences) => {
                info!("Loaded preferences from {}", path.display());
                preferences
            }
            Err(e) => {
                warn!("Failed to load preferences from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save to the config directory, creating it if needed
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.save_to(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Zoom step usable by the camera (at least one rounding unit)
    pub fn zoom_step(&self) -> f32 {
        round_zoom(self.zoom_step)
    }

    /// Move `path` to the front of the recent list, keeping at most
    /// [`MAX_RECENT_DOCUMENTS`] entries
    ///
    /// The display name is the file stem.
    pub fn add_recent_document(&mut self, path: &Path) {
        let key = path.to_string_lossy().into_owned();
        self.recent_documents.retain(|d| d.path != key);

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| key.clone());
        let last_opened = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.recent_documents.insert(
            0,
            RecentDocument {
                path: key,
                name,
                last_opened,
            },
        );
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
    }

    /// Forget a document, e.g. one that no longer exists
    pub fn remove_recent_document(&mut self, path: &Path) {
        let key = path.to_string_lossy();
        self.recent_documents.retain(|d| d.path != key);
    }

    /// Most recently opened document
    pub fn last_document(&self) -> Option<&RecentDocument> {
        self.recent_documents.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::MIN_ZOOM;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);

        let mut preferences = EditorPreferences::default();
        preferences.initial_zoom = 2.0;
        preferences.default_fps = 12;
        preferences
            .keybindings
            .insert("toggle_tool".to_string(), "KeyH".to_string());
        preferences.add_recent_document(Path::new("/tmp/hero.json"));
        preferences.save_to(&path).unwrap();

        let loaded = EditorPreferences::load_from(&path).unwrap();
        assert_eq!(loaded, preferences);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let preferences: EditorPreferences = toml::from_str("default_fps = 24\n").unwrap();
        assert_eq!(preferences.default_fps, 24);
        assert_eq!(preferences.initial_zoom, 1.0);
        assert!(preferences.show_grid);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        std::fs::write(&path, "initial_zoom = [").unwrap();
        assert!(matches!(
            EditorPreferences::load_from(&path),
            Err(PreferencesError::Parse(_))
        ));
    }

    #[test]
    fn test_recent_documents_are_bounded_and_deduplicated() {
        let mut preferences = EditorPreferences::default();
        for i in 0..15 {
            preferences.add_recent_document(&PathBuf::from(format!("/docs/{i}.json")));
        }
        assert_eq!(preferences.recent_documents.len(), MAX_RECENT_DOCUMENTS);
        assert_eq!(preferences.last_document().unwrap().name, "14");

        preferences.add_recent_document(Path::new("/docs/10.json"));
        assert_eq!(preferences.recent_documents.len(), MAX_RECENT_DOCUMENTS);
        assert_eq!(preferences.last_document().unwrap().name, "10");
        assert_eq!(preferences.last_document().unwrap().path, "/docs/10.json");

        preferences.remove_recent_document(Path::new("/docs/10.json"));
        assert_eq!(preferences.last_document().unwrap().name, "14");
    }

    #[test]
    fn test_zoom_step_has_floor() {
        let mut preferences = EditorPreferences::default();
        preferences.zoom_step = 0.0;
        assert_eq!(preferences.zoom_step(), MIN_ZOOM);
        preferences.zoom_step = 0.25;
        assert_eq!(preferences.zoom_step(), 0.3);
    }
}
