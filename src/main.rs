use anyhow::{anyhow, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use refdesk::cli::CliArgs;
use refdesk::geometry::Size;
use refdesk::store::FileStorage;
use refdesk::{DeskConfig, DeskContext, LayoutStore, PanelManager, PanelOptions};

mod runtime;

use runtime::App;

fn main() -> Result<()> {
    refdesk::logging::init();

    let startup = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;
    let config = startup.apply_to(DeskConfig::load());

    let mut builder = LayoutStore::builder();
    match startup.resolve_state_path(&config) {
        Some(path) => {
            tracing::info!("State file: {}", path.display());
            builder = builder.storage(FileStorage::new(path));
        }
        None => tracing::warn!("No state file location; the desktop will not be saved"),
    }
    let store = builder.build();
    if !startup.fresh && store.hydrate() {
        tracing::info!("Restored {} panel(s)", store.state().panels.len());
    }

    let (width, height) = startup.window_size;
    let ctx = DeskContext::new(store, config, Size::new(width as f64, height as f64));
    let registry = refdesk::panels::builtin_registry()?;
    let mut manager = PanelManager::new(ctx, registry);
    manager.update_breakpoint();

    for panel_type in &startup.open {
        if let Err(e) = manager.create_panel(panel_type.clone(), PanelOptions::default()) {
            tracing::warn!("Could not open {}: {}", panel_type, e);
        }
    }
    if let Some(mode) = startup.arrange {
        let moved = manager.arrange_panels(mode);
        tracing::debug!("Arranged {} panel(s) as {}", moved, mode);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(manager, startup.window_size);
    event_loop.run_app(&mut app)?;
    Ok(())
}
