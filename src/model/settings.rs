//! User-facing application settings (persisted)

use serde::{Deserialize, Serialize};

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

/// Application settings
///
/// Missing fields in a persisted snapshot fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub font_size: u32,
    pub font_family: String,
    pub animations: bool,
    pub auto_save: bool,
    /// Milliseconds between automatic saves
    pub save_interval: u64,
    pub sound_enabled: bool,
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            font_size: 14,
            font_family: "monospace".to_string(),
            animations: true,
            auto_save: true,
            save_interval: 30_000,
            sound_enabled: false,
            language: "en".to_string(),
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub theme: Option<ThemeMode>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub animations: Option<bool>,
    pub auto_save: Option<bool>,
    pub save_interval: Option<u64>,
    pub sound_enabled: Option<bool>,
    pub language: Option<String>,
}

impl AppSettings {
    /// Merge `update` into these settings
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(font_size) = update.font_size.filter(|s| *s > 0) {
            self.font_size = font_size;
        }
        if let Some(family) = update.font_family.as_ref().filter(|f| !f.is_empty()) {
            self.font_family = family.clone();
        }
        if let Some(animations) = update.animations {
            self.animations = animations;
        }
        if let Some(auto_save) = update.auto_save {
            self.auto_save = auto_save;
        }
        if let Some(interval) = update.save_interval.filter(|i| *i > 0) {
            self.save_interval = interval;
        }
        if let Some(sound) = update.sound_enabled {
            self.sound_enabled = sound;
        }
        if let Some(language) = update.language.as_ref().filter(|l| !l.is_empty()) {
            self.language = language.clone();
        }
    }
}
