use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::constants::{
    DOORS_OPEN_DELAY_MS, IMAGE_HEIGHT, IMAGE_WIDTH, NAVIGATE_DELAY_MS, TRANSITION_DESTINATION,
};
use crate::surface::MapSurface;

/// Phases of the scripted full-screen transition. Strictly ordered:
/// idle -> running -> doors_open -> navigating, never backwards within a
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Running,
    DoorsOpen,
    Navigating,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::Idle => "idle",
            TransitionPhase::Running => "running",
            TransitionPhase::DoorsOpen => "doors_open",
            TransitionPhase::Navigating => "navigating",
        }
    }
}

/// Viewport geometry as last reported by the browser: Leaflet's zoom scale
/// relative to zoom 0 and the minimum corner of its pixel bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom_scale: f64,
    pub min_x: f64,
    pub min_y: f64,
}

/// CSS background geometry that repaints the exact view the user was
/// looking at onto the transition overlay strips. Capturing the live DOM
/// itself is the browser's job; the core only computes where the world
/// image has to sit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrozenView {
    pub bg_size: String,
    pub bg_pos: String,
}

impl FrozenView {
    pub fn capture(image_width: f64, image_height: f64, viewport: &ViewportState) -> Self {
        let scale = viewport.zoom_scale;
        Self {
            bg_size: format!("{}px {}px", image_width * scale, image_height * scale),
            bg_pos: format!("{}px {}px", -viewport.min_x, -viewport.min_y),
        }
    }
}

/// Drives the door-opening animation and the final navigation as a timed
/// phase sequence. A sequence already in flight cannot be restarted:
/// rapid repeated clicks on the trigger marker must never schedule
/// overlapping timers.
pub struct TransitionSequencer {
    phase: Mutex<TransitionPhase>,
    doors_open_delay: Duration,
    navigate_delay: Duration,
    destination: String,
}

impl TransitionSequencer {
    pub fn new() -> Self {
        Self::with_timing(
            Duration::from_millis(DOORS_OPEN_DELAY_MS),
            Duration::from_millis(NAVIGATE_DELAY_MS),
            TRANSITION_DESTINATION,
        )
    }

    pub fn with_timing(
        doors_open_delay: Duration,
        navigate_delay: Duration,
        destination: &str,
    ) -> Self {
        Self {
            phase: Mutex::new(TransitionPhase::Idle),
            doors_open_delay,
            navigate_delay,
            destination: destination.to_string(),
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        *self.phase.lock().unwrap()
    }

    /// Starts the scripted sequence. Returns false, and changes nothing,
    /// when a sequence is already in flight.
    pub fn trigger(
        self: &Arc<Self>,
        surface: Arc<dyn MapSurface>,
        viewport: Option<&ViewportState>,
    ) -> bool {
        if !self.begin() {
            return false;
        }

        let frozen = viewport.map(|v| FrozenView::capture(IMAGE_WIDTH, IMAGE_HEIGHT, v));
        surface.transition_phase(TransitionPhase::Running.as_str(), frozen.as_ref());

        let sequencer = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(sequencer.doors_open_delay).await;
            sequencer.open_doors(surface.as_ref());

            let remaining = sequencer
                .navigate_delay
                .saturating_sub(sequencer.doors_open_delay);
            tokio::time::sleep(remaining).await;
            sequencer.complete(surface.as_ref());
        });
        true
    }

    fn begin(&self) -> bool {
        let mut phase = self.phase.lock().unwrap();
        if *phase != TransitionPhase::Idle {
            return false;
        }
        *phase = TransitionPhase::Running;
        true
    }

    fn open_doors(&self, surface: &dyn MapSurface) {
        *self.phase.lock().unwrap() = TransitionPhase::DoorsOpen;
        surface.transition_phase(TransitionPhase::DoorsOpen.as_str(), None);
    }

    fn complete(&self, surface: &dyn MapSurface) {
        *self.phase.lock().unwrap() = TransitionPhase::Navigating;
        surface.navigate(&self.destination);
    }
}

impl Default for TransitionSequencer {
    fn default() -> Self {
        Self::new()
    }
}
