use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::grid::DisplayCoordinate;
use crate::panel::PanelState;
use crate::server::events::{MapEvent, MapEventData};
use crate::transition::FrozenView;

/// A marker as handed to the display surface. `popup` is the inline popup
/// HTML for panel-style markers; the transition marker carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
}

/// The seam between the interaction core and the Leaflet viewport.
///
/// The core only ever needs three abilities from the display surface: put a
/// marker at a continuous coordinate, show a popup at a coordinate, and
/// push presentation commands (panel content, transition phases,
/// navigation) out to the viewport. Everything else Leaflet does is its own
/// business.
pub trait MapSurface: Send + Sync {
    fn place_marker(&self, marker: Marker) -> Result<()>;
    fn show_popup(&self, at: DisplayCoordinate, html: &str);
    fn update_panel(&self, state: &PanelState);
    fn transition_phase(&self, phase: &str, frozen: Option<&FrozenView>);
    fn navigate(&self, url: &str);
}

/// Production surface: markers accumulate in shared state (served to the
/// browser via `GET /api/locations`) and presentation commands go out over
/// the SSE broadcast channel.
pub struct RemoteSurface {
    markers: Arc<Mutex<Vec<Marker>>>,
    events: broadcast::Sender<MapEvent>,
}

impl RemoteSurface {
    pub fn new(events: broadcast::Sender<MapEvent>) -> Self {
        Self {
            markers: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.markers.lock().unwrap().clone()
    }

    fn send(&self, event: MapEvent) {
        // No subscribers just means nobody is watching yet
        let _ = self.events.send(event);
    }
}

impl MapSurface for RemoteSurface {
    fn place_marker(&self, marker: Marker) -> Result<()> {
        if !marker.x.is_finite() || !marker.y.is_finite() {
            anyhow::bail!(
                "Malformed coordinate ({}, {}) for marker '{}'",
                marker.x,
                marker.y,
                marker.id
            );
        }
        self.markers.lock().unwrap().push(marker);
        Ok(())
    }

    fn show_popup(&self, at: DisplayCoordinate, html: &str) {
        self.send(MapEvent {
            event_type: "popup".to_string(),
            data: MapEventData {
                x: Some(at.x),
                y: Some(at.y),
                html: Some(html.to_string()),
                ..Default::default()
            },
        });
    }

    fn update_panel(&self, state: &PanelState) {
        self.send(MapEvent {
            event_type: "panel_update".to_string(),
            data: MapEventData {
                panel: Some(state.clone()),
                ..Default::default()
            },
        });
    }

    fn transition_phase(&self, phase: &str, frozen: Option<&FrozenView>) {
        self.send(MapEvent {
            event_type: "transition_phase".to_string(),
            data: MapEventData {
                phase: Some(phase.to_string()),
                frozen: frozen.cloned(),
                ..Default::default()
            },
        });
    }

    fn navigate(&self, url: &str) {
        self.send(MapEvent {
            event_type: "navigate".to_string(),
            data: MapEventData {
                url: Some(url.to_string()),
                ..Default::default()
            },
        });
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Call log of a [`RecordingSurface`], one entry per surface call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        PlaceMarker(String),
        Popup { x: f64, y: f64, html: String },
        PanelUpdate(PanelState),
        TransitionPhase(String),
        Navigate(String),
    }

    /// Test double that records every call; marker placement can be forced
    /// to fail for chosen ids.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub calls: Mutex<Vec<SurfaceCall>>,
        pub fail_marker_ids: Vec<String>,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_for(ids: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_marker_ids: ids.iter().map(|s| s.to_string()).collect(),
            }
        }

        pub fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, matches: impl Fn(&SurfaceCall) -> bool) -> usize {
            self.calls().into_iter().filter(|c| matches(c)).count()
        }
    }

    impl MapSurface for RecordingSurface {
        fn place_marker(&self, marker: Marker) -> Result<()> {
            if self.fail_marker_ids.contains(&marker.id) {
                anyhow::bail!("forced placement failure for '{}'", marker.id);
            }
            self.calls
                .lock()
                .unwrap()
                .push(SurfaceCall::PlaceMarker(marker.id));
            Ok(())
        }

        fn show_popup(&self, at: DisplayCoordinate, html: &str) {
            self.calls.lock().unwrap().push(SurfaceCall::Popup {
                x: at.x,
                y: at.y,
                html: html.to_string(),
            });
        }

        fn update_panel(&self, state: &PanelState) {
            self.calls
                .lock()
                .unwrap()
                .push(SurfaceCall::PanelUpdate(state.clone()));
        }

        fn transition_phase(&self, phase: &str, _frozen: Option<&FrozenView>) {
            self.calls
                .lock()
                .unwrap()
                .push(SurfaceCall::TransitionPhase(phase.to_string()));
        }

        fn navigate(&self, url: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(SurfaceCall::Navigate(url.to_string()));
        }
    }
}
