//! refdesk - a desktop of floating panels
//!
//! A single store owns the canonical state and changes it only through a
//! pure reducer. Panels, the manager and the interaction handlers read from
//! the store and write back by dispatching actions.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod context;
pub mod error;
pub mod events;
pub mod geometry;
pub mod interaction;
pub mod logging;
pub mod manager;
pub mod messages;
pub mod model;
pub mod panel;
pub mod panels;
pub mod store;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use config::DeskConfig;
pub use context::DeskContext;
pub use error::{DeskError, Result};
pub use events::{DeskEvent, EventBus};
pub use manager::{ArrangeMode, PanelManager, PanelOptions};
pub use messages::Action;
pub use model::AppState;
pub use panel::{Panel, PanelState};
pub use store::LayoutStore;
