use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use super::events::MapEvent;
use crate::dispatcher::MarkerDispatcher;
use crate::grid::GridSpec;
use crate::panel::PanelPresenter;
use crate::probe::DiagnosticProbe;
use crate::registry::LocationRegistry;
use crate::settings::Settings;
use crate::surface::RemoteSurface;

// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LocationRegistry>,
    pub grid: GridSpec,
    pub surface: Arc<RemoteSurface>,
    pub dispatcher: Arc<MarkerDispatcher>,
    pub panel: Arc<PanelPresenter>,
    pub probe: Arc<DiagnosticProbe>,
    pub settings: Arc<Mutex<Settings>>,
    pub event_sender: broadcast::Sender<MapEvent>,
}
