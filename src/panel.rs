use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::surface::MapSurface;

/// Content of the single info panel region. Replaced wholesale on every
/// selection, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PanelState {
    pub title: String,
    pub body: String,
    /// At most one illustration at a time - the previous image is always
    /// dropped before a new one is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Presents location details in the side panel. Constructed without a host
/// surface the presenter is inert: every call becomes a no-op, matching a
/// page that simply has no panel region.
pub struct PanelPresenter {
    host: Option<Arc<dyn MapSurface>>,
    state: Mutex<PanelState>,
}

impl PanelPresenter {
    pub fn new(host: Arc<dyn MapSurface>) -> Self {
        Self {
            host: Some(host),
            state: Mutex::new(PanelState::default()),
        }
    }

    /// A presenter with no panel region to write to.
    pub fn detached() -> Self {
        Self {
            host: None,
            state: Mutex::new(PanelState::default()),
        }
    }

    /// Replaces the panel's title, body and illustration. The old image is
    /// removed before any new one is inserted; the browser loads the new
    /// one lazily and nothing here waits for it.
    pub fn present(&self, title: &str, text: &str, image: Option<&str>) {
        let Some(host) = &self.host else { return };

        let mut state = self.state.lock().unwrap();
        state.image = None;
        state.title = title.to_string();
        state.body = text.to_string();
        state.image = image.map(|path| path.to_string());

        host.update_panel(&state);
    }

    /// Snapshot of the current panel content, for `GET /api/panel`.
    pub fn state(&self) -> PanelState {
        self.state.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{RecordingSurface, SurfaceCall};

    #[test]
    fn present_replaces_state_wholesale() {
        let surface = Arc::new(RecordingSurface::new());
        let presenter = PanelPresenter::new(surface.clone());

        presenter.present("Rimeholt Keep", "A stone keep.", Some("assets/rimeholt.webp"));
        let state = presenter.state();
        assert_eq!(state.title, "Rimeholt Keep");
        assert_eq!(state.body, "A stone keep.");
        assert_eq!(state.image.as_deref(), Some("assets/rimeholt.webp"));
        assert_eq!(
            surface.count(|c| matches!(c, SurfaceCall::PanelUpdate(_))),
            1
        );
    }

    #[test]
    fn image_never_leaks_into_the_next_selection() {
        let surface = Arc::new(RecordingSurface::new());
        let presenter = PanelPresenter::new(surface);

        presenter.present("Estmere", "A practical stop.", Some("assets/estmere.webp"));
        presenter.present("Blackmere", "A coastal pull.", None);

        let state = presenter.state();
        assert_eq!(state.title, "Blackmere");
        assert!(state.image.is_none());
    }

    #[test]
    fn detached_presenter_is_a_no_op() {
        let presenter = PanelPresenter::detached();
        presenter.present("Capital", "Gates and whispers.", None);
        assert_eq!(presenter.state(), PanelState::default());
    }
}
