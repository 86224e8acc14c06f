use serde::{Deserialize, Serialize};

use crate::panel::PanelState;
use crate::transition::FrozenView;

// SSE event types pushed to the viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapEvent {
    pub event_type: String,
    pub data: MapEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapEventData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub html: Option<String>,
    pub panel: Option<PanelState>,
    pub phase: Option<String>,
    pub frozen: Option<FrozenView>,
    pub url: Option<String>,
    pub message: Option<String>,
}
