use std::sync::Arc;

use crate::grid::GridSpec;
use crate::panel::PanelPresenter;
use crate::registry::{LocationRegistry, MarkerBehavior};
use crate::surface::{MapSurface, Marker};
use crate::transition::{TransitionSequencer, ViewportState};

/// Places one marker per registry entry and routes marker clicks to either
/// the info panel or the transition sequencer, selected by the record's
/// behavior tag.
pub struct MarkerDispatcher {
    registry: Arc<LocationRegistry>,
    spec: GridSpec,
    surface: Arc<dyn MapSurface>,
    panel: Arc<PanelPresenter>,
    sequencer: Arc<TransitionSequencer>,
}

impl MarkerDispatcher {
    pub fn new(
        registry: Arc<LocationRegistry>,
        spec: GridSpec,
        surface: Arc<dyn MapSurface>,
        panel: Arc<PanelPresenter>,
        sequencer: Arc<TransitionSequencer>,
    ) -> Self {
        Self {
            registry,
            spec,
            surface,
            panel,
            sequencer,
        }
    }

    /// Runs once after the display surface is ready. Each marker's setup is
    /// independent: one bad record costs that one marker, never the rest.
    /// Returns (placed, failed).
    pub fn place_markers(&self) -> (usize, usize) {
        let mut placed = 0;
        let mut failed = 0;

        for record in self.registry.iter() {
            let coord = self.spec.to_display_coordinate(record.grid);
            // Panel-style markers also carry the inline popup Leaflet shows
            // on click; the transition marker must not open one
            let popup = match record.behavior {
                MarkerBehavior::ShowPanel => Some(format!(
                    "<b>{}</b><br>{}",
                    record.name, record.description
                )),
                MarkerBehavior::Transition => None,
            };

            let marker = Marker {
                id: record.id.clone(),
                name: record.name.clone(),
                x: coord.x,
                y: coord.y,
                popup,
            };
            match self.surface.place_marker(marker) {
                Ok(()) => placed += 1,
                Err(e) => {
                    eprintln!("⚠️  Failed to place marker '{}': {}", record.id, e);
                    failed += 1;
                }
            }
        }

        (placed, failed)
    }

    /// Handles a marker click reported by the viewport. A click on an id
    /// the registry does not know is silently dropped.
    pub fn marker_clicked(&self, id: &str, viewport: Option<&ViewportState>) {
        let Some(record) = self.registry.get(id) else {
            eprintln!("⚠️  Click on unknown marker '{}' dropped", id);
            return;
        };

        match record.behavior {
            MarkerBehavior::ShowPanel => {
                self.panel
                    .present(&record.name, &record.description, record.image.as_deref());
            }
            MarkerBehavior::Transition => {
                self.sequencer.trigger(Arc::clone(&self.surface), viewport);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridCell;
    use crate::registry::LocationRecord;
    use crate::surface::testing::{RecordingSurface, SurfaceCall};
    use crate::transition::TransitionPhase;
    use std::time::Duration;

    fn spec() -> GridSpec {
        GridSpec::new(60, 60, 4096.0, 4096.0)
    }

    fn record(id: &str, behavior: MarkerBehavior) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            name: format!("Name of {}", id),
            category: "town".to_string(),
            grid: GridCell::new(10, 10),
            description: format!("About {}", id),
            image: Some(format!("assets/locations/{}.webp", id)),
            behavior,
        }
    }

    fn dispatcher_with(
        surface: Arc<RecordingSurface>,
        records: Vec<LocationRecord>,
    ) -> MarkerDispatcher {
        let registry = Arc::new(LocationRegistry::new(records, &spec()).unwrap());
        let panel = Arc::new(PanelPresenter::new(surface.clone()));
        let sequencer = Arc::new(TransitionSequencer::with_timing(
            Duration::from_millis(1),
            Duration::from_millis(2),
            "velis.html",
        ));
        MarkerDispatcher::new(registry, spec(), surface, panel, sequencer)
    }

    #[test]
    fn every_record_gets_a_marker() {
        let surface = Arc::new(RecordingSurface::new());
        let dispatcher = dispatcher_with(
            surface.clone(),
            vec![
                record("a", MarkerBehavior::ShowPanel),
                record("b", MarkerBehavior::Transition),
            ],
        );

        let (placed, failed) = dispatcher.place_markers();
        assert_eq!((placed, failed), (2, 0));
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::PlaceMarker("a".to_string()),
                SurfaceCall::PlaceMarker("b".to_string()),
            ]
        );
    }

    #[test]
    fn one_failed_marker_does_not_stop_the_rest() {
        let surface = Arc::new(RecordingSurface::failing_for(&["b"]));
        let dispatcher = dispatcher_with(
            surface.clone(),
            vec![
                record("a", MarkerBehavior::ShowPanel),
                record("b", MarkerBehavior::ShowPanel),
                record("c", MarkerBehavior::ShowPanel),
            ],
        );

        let (placed, failed) = dispatcher.place_markers();
        assert_eq!((placed, failed), (2, 1));
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::PlaceMarker("a".to_string()),
                SurfaceCall::PlaceMarker("c".to_string()),
            ]
        );
    }

    #[test]
    fn panel_marker_click_presents_and_never_transitions() {
        let surface = Arc::new(RecordingSurface::new());
        let dispatcher = dispatcher_with(
            surface.clone(),
            vec![
                record("estmere", MarkerBehavior::ShowPanel),
                record("fallenarchive", MarkerBehavior::Transition),
            ],
        );

        dispatcher.marker_clicked("estmere", None);

        assert_eq!(
            surface.count(|c| matches!(c, SurfaceCall::PanelUpdate(_))),
            1
        );
        assert_eq!(dispatcher.sequencer.phase(), TransitionPhase::Idle);

        let state = dispatcher.panel.state();
        assert_eq!(state.title, "Name of estmere");
        assert_eq!(state.body, "About estmere");
        assert_eq!(
            state.image.as_deref(),
            Some("assets/locations/estmere.webp")
        );
    }

    #[tokio::test]
    async fn transition_marker_click_triggers_the_sequencer_and_not_the_panel() {
        let surface = Arc::new(RecordingSurface::new());
        let dispatcher = dispatcher_with(
            surface.clone(),
            vec![
                record("estmere", MarkerBehavior::ShowPanel),
                record("fallenarchive", MarkerBehavior::Transition),
            ],
        );

        dispatcher.marker_clicked("fallenarchive", None);

        assert_ne!(dispatcher.sequencer.phase(), TransitionPhase::Idle);
        assert_eq!(
            surface.count(|c| matches!(c, SurfaceCall::PanelUpdate(_))),
            0
        );
        assert_eq!(
            surface.count(|c| matches!(c, SurfaceCall::TransitionPhase(p) if p == "running")),
            1
        );
    }

    #[test]
    fn unknown_marker_click_is_dropped() {
        let surface = Arc::new(RecordingSurface::new());
        let dispatcher =
            dispatcher_with(surface.clone(), vec![record("a", MarkerBehavior::ShowPanel)]);

        dispatcher.marker_clicked("nowhere", None);
        assert!(surface.calls().is_empty());
    }
}
