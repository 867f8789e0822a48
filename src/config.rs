//! Desktop configuration
//!
//! Read from `~/.config/refdesk/config.yaml`. Every field is optional in the
//! file; a missing or unreadable file yields the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Engine tunables that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Most panels that may be open at once
    pub max_panels: usize,
    /// Height reserved at the top of the desktop for the navigation bar
    pub nav_height: f64,
    /// Size given to panels created without one
    pub default_panel_size: Size,
    /// Keyboard move/resize step, and the step with Shift held
    pub keyboard_step: f64,
    pub keyboard_step_large: f64,
    /// Snap resized edges to this grid
    pub grid_size: Option<f64>,
    /// Keep a panel's width/height ratio while resizing
    pub lock_aspect_ratio: bool,
    /// Thickness of the resize handles along a panel's border
    pub handle_thickness: f64,
    /// File name of the persisted snapshot inside the config directory
    pub state_file: Option<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            max_panels: 10,
            nav_height: 60.0,
            default_panel_size: Size::new(400.0, 300.0),
            keyboard_step: 1.0,
            keyboard_step_large: 10.0,
            grid_size: None,
            lock_aspect_ratio: false,
            handle_thickness: 8.0,
            state_file: None,
        }
    }
}

impl DeskConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating the directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace values that would break the engine with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_panels == 0 {
            self.max_panels = defaults.max_panels;
        }
        if !self.nav_height.is_finite() || self.nav_height < 0.0 {
            self.nav_height = defaults.nav_height;
        }
        if !self.default_panel_size.is_finite()
            || self.default_panel_size.width <= 0.0
            || self.default_panel_size.height <= 0.0
        {
            self.default_panel_size = defaults.default_panel_size;
        }
        if !self.keyboard_step.is_finite() || self.keyboard_step <= 0.0 {
            self.keyboard_step = defaults.keyboard_step;
        }
        if !self.keyboard_step_large.is_finite() || self.keyboard_step_large <= 0.0 {
            self.keyboard_step_large = defaults.keyboard_step_large;
        }
        self.grid_size = self.grid_size.filter(|g| g.is_finite() && *g > 0.0);
        if !self.handle_thickness.is_finite() || self.handle_thickness <= 0.0 {
            self.handle_thickness = defaults.handle_thickness;
        }
        self
    }
}
