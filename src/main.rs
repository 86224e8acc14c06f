use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

// Import modules
mod constants;
mod dispatcher;
mod grid;
mod panel;
mod probe;
mod registry;
mod server;
mod settings;
mod surface;
mod transition;
mod utils;

use constants::{GRID_COLS, GRID_ROWS, IMAGE_HEIGHT, IMAGE_WIDTH};
use dispatcher::MarkerDispatcher;
use grid::GridSpec;
use panel::PanelPresenter;
use probe::DiagnosticProbe;
use registry::LocationRegistry;
use server::{start_server, state::AppState};
use settings::Settings;
use surface::{MapSurface, RemoteSurface};
use transition::TransitionSequencer;

#[tokio::main]
async fn main() -> Result<()> {
    println!("🗺️  LoreMap v0.3 - interactive world map starting...");

    let settings = Settings::load().with_context(|| "Failed to load settings")?;

    let spec = GridSpec::new(GRID_COLS, GRID_ROWS, IMAGE_WIDTH, IMAGE_HEIGHT);

    // Build the location registry once; it is immutable for the whole session
    let registry = match settings.locations_file {
        Some(ref path) => {
            println!("📂 Loading locations from {}", path);
            LocationRegistry::from_file(path, &spec)?
        }
        None => LocationRegistry::builtin(&spec)?,
    };
    println!("✅ Loaded {} locations", registry.len());
    let registry = Arc::new(registry);

    // Wire the interaction core against the SSE-backed display surface
    let (event_sender, _event_receiver) = broadcast::channel(100);
    let surface = Arc::new(RemoteSurface::new(event_sender.clone()));
    let surface_dyn: Arc<dyn MapSurface> = surface.clone();

    let panel = Arc::new(PanelPresenter::new(surface_dyn.clone()));
    let sequencer = Arc::new(TransitionSequencer::new());
    let dispatcher = Arc::new(MarkerDispatcher::new(
        registry.clone(),
        spec,
        surface_dyn.clone(),
        panel.clone(),
        sequencer,
    ));

    let (placed, failed) = dispatcher.place_markers();
    if failed > 0 {
        println!("📍 Placed {} markers ({} failed)", placed, failed);
    } else {
        println!("📍 Placed {} markers", placed);
    }

    let probe = Arc::new(DiagnosticProbe::new(
        spec,
        surface_dyn,
        settings.show_grid_probe,
    ));
    if probe.is_enabled() {
        println!("🔍 Grid probe enabled - click anywhere on the map for its grid cell");
    }

    let port = settings.port;
    let auto_open = settings.auto_open_browser;

    let app_state = AppState {
        registry,
        grid: spec,
        surface,
        dispatcher,
        panel,
        probe,
        settings: Arc::new(Mutex::new(settings)),
        event_sender,
    };

    if auto_open {
        utils::open_browser(&format!("http://127.0.0.1:{}", port));
    }

    start_server(app_state, port).await?;

    Ok(())
}
