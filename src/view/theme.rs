//! Desktop color palettes
//!
//! Two built-in palettes follow `settings.theme`. Either can be overridden
//! from `~/.config/refdesk/theme-{dark,light}.yaml`; every key is optional
//! and takes a `#RRGGBB` or `#RRGGBBAA` string.

use std::path::Path;

use serde::Deserialize;

use crate::model::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xAARRGGBB`, the layout softbuffer presents
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub desktop: Color,
    pub nav_bar: Color,
    pub panel_body: Color,
    pub header: Color,
    pub header_active: Color,
    pub border: Color,
    pub border_active: Color,
    pub control: Color,
    pub control_close: Color,
    pub content_line: Color,
    pub error: Color,
    /// Outline drawn around a panel while it is dragged or resized
    pub interaction: Color,
    pub notification: Color,
}

impl Palette {
    pub const fn dark() -> Self {
        Self {
            desktop: Color::rgb(0x1E, 0x1F, 0x22),
            nav_bar: Color::rgb(0x2B, 0x2D, 0x30),
            panel_body: Color::rgb(0x25, 0x27, 0x2B),
            header: Color::rgb(0x33, 0x36, 0x3B),
            header_active: Color::rgb(0x3D, 0x4A, 0x63),
            border: Color::rgb(0x43, 0x45, 0x4A),
            border_active: Color::rgb(0x57, 0x8A, 0xF0),
            control: Color::rgb(0x6F, 0x73, 0x7A),
            control_close: Color::rgb(0xC7, 0x54, 0x50),
            content_line: Color::rgb(0x4E, 0x52, 0x58),
            error: Color::rgb(0xE0, 0x6C, 0x75),
            interaction: Color::rgba(0x57, 0x8A, 0xF0, 0x80),
            notification: Color::rgb(0x3C, 0x3F, 0x41),
        }
    }

    pub const fn light() -> Self {
        Self {
            desktop: Color::rgb(0xF2, 0xF3, 0xF5),
            nav_bar: Color::rgb(0xFF, 0xFF, 0xFF),
            panel_body: Color::rgb(0xFF, 0xFF, 0xFF),
            header: Color::rgb(0xE6, 0xE8, 0xEB),
            header_active: Color::rgb(0xCF, 0xDE, 0xFA),
            border: Color::rgb(0xC9, 0xCC, 0xD1),
            border_active: Color::rgb(0x35, 0x74, 0xF0),
            control: Color::rgb(0x8C, 0x90, 0x96),
            control_close: Color::rgb(0xDB, 0x5C, 0x5C),
            content_line: Color::rgb(0xD5, 0xD8, 0xDC),
            error: Color::rgb(0xC9, 0x2C, 0x36),
            interaction: Color::rgba(0x35, 0x74, 0xF0, 0x80),
            notification: Color::rgb(0xFF, 0xF4, 0xD6),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Apply YAML overrides on top of `self`
    pub fn with_yaml(mut self, yaml: &str) -> Result<Self, String> {
        let data: PaletteData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse palette: {}", e))?;
        let fields: [(&Option<String>, &mut Color); 13] = [
            (&data.desktop, &mut self.desktop),
            (&data.nav_bar, &mut self.nav_bar),
            (&data.panel_body, &mut self.panel_body),
            (&data.header, &mut self.header),
            (&data.header_active, &mut self.header_active),
            (&data.border, &mut self.border),
            (&data.border_active, &mut self.border_active),
            (&data.control, &mut self.control),
            (&data.control_close, &mut self.control_close),
            (&data.content_line, &mut self.content_line),
            (&data.error, &mut self.error),
            (&data.interaction, &mut self.interaction),
            (&data.notification, &mut self.notification),
        ];
        for (hex, color) in fields {
            if let Some(hex) = hex {
                *color = Color::from_hex(hex)?;
            }
        }
        Ok(self)
    }

    /// Built-in palette for `mode` with the user's override file applied,
    /// if there is a readable one
    pub fn load(mode: ThemeMode) -> Self {
        let base = Self::for_mode(mode);
        let name = match mode {
            ThemeMode::Dark => "theme-dark.yaml",
            ThemeMode::Light => "theme-light.yaml",
        };
        match crate::config_paths::config_dir() {
            Some(dir) => base.with_overrides_from(&dir.join(name)),
            None => base,
        }
    }

    fn with_overrides_from(self, path: &Path) -> Self {
        let Ok(yaml) = std::fs::read_to_string(path) else {
            return self;
        };
        match self.with_yaml(&yaml) {
            Ok(palette) => {
                tracing::info!("Loaded palette overrides from {}", path.display());
                palette
            }
            Err(e) => {
                tracing::warn!("Ignoring palette overrides in {}: {}", path.display(), e);
                self
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

/// Raw override file; every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaletteData {
    desktop: Option<String>,
    nav_bar: Option<String>,
    panel_body: Option<String>,
    header: Option<String>,
    header_active: Option<String>,
    border: Option<String>,
    border_active: Option<String>,
    control: Option<String>,
    control_close: Option<String>,
    content_line: Option<String>,
    error: Option<String>,
    interaction: Option<String>,
    notification: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF8000"), Ok(Color::rgb(255, 128, 0)));
        assert_eq!(
            Color::from_hex("10203040"),
            Ok(Color::rgba(0x10, 0x20, 0x30, 0x40))
        );
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
        assert_eq!(Color::rgb(1, 2, 3).to_argb_u32(), 0xFF010203);
    }

    #[test]
    fn test_yaml_overrides_only_named_keys() {
        let palette = Palette::dark()
            .with_yaml("desktop: \"#000000\"\nerror: \"#FF0000\"\n")
            .unwrap();
        assert_eq!(palette.desktop, Color::rgb(0, 0, 0));
        assert_eq!(palette.error, Color::rgb(255, 0, 0));
        assert_eq!(palette.header, Palette::dark().header);
    }

    #[test]
    fn test_bad_override_file_keeps_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme-dark.yaml");
        std::fs::write(&path, "desktop: \"#nope\"").unwrap();
        assert_eq!(
            Palette::dark().with_overrides_from(&path),
            Palette::dark()
        );
    }
}
