//! Command-line argument parsing for the desktop
//!
//! Supports:
//! - Choosing the persisted state file
//! - Starting fresh (ignoring the saved snapshot)
//! - Initial window size
//! - Arranging the restored panels on startup
//! - Overriding the panel limit
//! - Opening panels of given types

use clap::Parser;
use std::path::PathBuf;

use crate::config::DeskConfig;
use crate::manager::ArrangeMode;
use crate::model::PanelType;

pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1280, 800);
const MIN_WINDOW_SIZE: (u32, u32) = (320, 240);

/// A virtual tabletop desktop of floating panels
#[derive(Parser, Debug)]
#[command(name = "refdesk", version, about = "A desktop of floating reference panels")]
pub struct CliArgs {
    /// Panel types to open on startup
    #[arg(value_name = "TYPES")]
    pub open: Vec<String>,

    /// Persisted state file (defaults to the config directory)
    #[arg(long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Ignore the saved desktop and start empty
    #[arg(long)]
    pub fresh: bool,

    /// Initial window width
    #[arg(long, value_name = "W")]
    pub width: Option<u32>,

    /// Initial window height
    #[arg(long, value_name = "H")]
    pub height: Option<u32>,

    /// Arrange panels after startup (cascade, tile or stack)
    #[arg(long, value_name = "MODE")]
    pub arrange: Option<ArrangeMode>,

    /// Maximum number of open panels
    #[arg(long, value_name = "N")]
    pub max_panels: Option<usize>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Explicit state file; `None` uses the config directory default
    pub state_path: Option<PathBuf>,
    pub fresh: bool,
    pub window_size: (u32, u32),
    pub arrange: Option<ArrangeMode>,
    pub max_panels: Option<usize>,
    pub open: Vec<PanelType>,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let width = self.width.unwrap_or(DEFAULT_WINDOW_SIZE.0);
        let height = self.height.unwrap_or(DEFAULT_WINDOW_SIZE.1);
        if width < MIN_WINDOW_SIZE.0 || height < MIN_WINDOW_SIZE.1 {
            return Err(format!(
                "Window must be at least {}x{} (got {}x{})",
                MIN_WINDOW_SIZE.0, MIN_WINDOW_SIZE.1, width, height
            ));
        }
        if self.max_panels == Some(0) {
            return Err("--max-panels must be at least 1".to_string());
        }
        if let Some(empty) = self.open.iter().find(|t| t.trim().is_empty()) {
            return Err(format!("Invalid panel type {:?}", empty));
        }

        Ok(StartupConfig {
            state_path: self.state,
            fresh: self.fresh,
            window_size: (width, height),
            arrange: self.arrange,
            max_panels: self.max_panels,
            open: self.open.into_iter().map(PanelType::new).collect(),
        })
    }
}

impl StartupConfig {
    /// Apply command-line overrides on top of the file config
    pub fn apply_to(&self, mut config: DeskConfig) -> DeskConfig {
        if let Some(max) = self.max_panels {
            config.max_panels = max;
        }
        config
    }

    /// State file to use, given the config's own setting
    pub fn resolve_state_path(&self, config: &DeskConfig) -> Option<PathBuf> {
        self.state_path
            .clone()
            .or_else(|| crate::config_paths::state_file(config.state_file.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            open: vec![],
            state: None,
            fresh: false,
            width: None,
            height: None,
            arrange: None,
            max_panels: None,
        }
    }

    #[test]
    fn test_defaults() {
        let config = args().into_config().unwrap();
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert!(!config.fresh);
        assert!(config.open.is_empty());
    }

    #[test]
    fn test_parse_flags() {
        let parsed = CliArgs::try_parse_from([
            "refdesk",
            "--fresh",
            "--arrange",
            "tile",
            "--max-panels",
            "4",
            "--state",
            "/tmp/desk.json",
            "notes",
            "dice",
        ])
        .unwrap();
        let config = parsed.into_config().unwrap();
        assert!(config.fresh);
        assert_eq!(config.arrange, Some(ArrangeMode::Tile));
        assert_eq!(config.max_panels, Some(4));
        assert_eq!(config.state_path, Some(PathBuf::from("/tmp/desk.json")));
        assert_eq!(config.open, vec![PanelType::new("notes"), PanelType::new("dice")]);
    }

    #[test]
    fn test_rejects_unknown_arrangement() {
        assert!(CliArgs::try_parse_from(["refdesk", "--arrange", "spiral"]).is_err());
    }

    #[test]
    fn test_rejects_tiny_window_and_zero_limit() {
        let tiny = CliArgs {
            width: Some(100),
            ..args()
        };
        assert!(tiny.into_config().is_err());

        let zero = CliArgs {
            max_panels: Some(0),
            ..args()
        };
        assert!(zero.into_config().is_err());
    }

    #[test]
    fn test_max_panels_override() {
        let config = CliArgs {
            max_panels: Some(3),
            ..args()
        }
        .into_config()
        .unwrap();
        assert_eq!(config.apply_to(DeskConfig::default()).max_panels, 3);
        assert_eq!(args().into_config().unwrap().apply_to(DeskConfig::default()).max_panels, 10);
    }
}
