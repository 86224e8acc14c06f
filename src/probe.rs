use std::sync::Arc;

use crate::grid::{DisplayCoordinate, GridCell, GridSpec};
use crate::surface::MapSurface;

/// Click-to-get-grid authoring tool: any non-marker click on the viewport
/// is reverse-mapped to its grid cell, shown as a transient popup at the
/// click position and echoed to the console. Disabled entirely in a
/// production setup via `show_grid_probe = false`.
pub struct DiagnosticProbe {
    spec: GridSpec,
    surface: Arc<dyn MapSurface>,
    enabled: bool,
}

impl DiagnosticProbe {
    pub fn new(spec: GridSpec, surface: Arc<dyn MapSurface>, enabled: bool) -> Self {
        Self {
            spec,
            surface,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Reports the grid cell under a viewport click. Never touches the
    /// registry, never persists anything.
    pub fn map_clicked(&self, x: f64, y: f64) -> Option<GridCell> {
        if !self.enabled {
            return None;
        }

        let cell = self.spec.to_grid_cell(x, y);
        self.surface.show_popup(
            DisplayCoordinate { x, y },
            &format!("<b>grid: [{}, {}]</b>", cell.col, cell.row),
        );
        println!(
            "grid: [{}, {}] pixels: {} {}",
            cell.col,
            cell.row,
            x.round(),
            y.round()
        );
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{RecordingSurface, SurfaceCall};

    fn spec() -> GridSpec {
        GridSpec::new(60, 60, 4096.0, 4096.0)
    }

    #[test]
    fn click_reports_the_containing_cell() {
        let surface = Arc::new(RecordingSurface::new());
        let probe = DiagnosticProbe::new(spec(), surface.clone(), true);

        let cell = probe.map_clicked(100.0, 100.0).unwrap();
        assert_eq!(cell, GridCell::new(1, 1));

        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Popup {
                x: 100.0,
                y: 100.0,
                html: "<b>grid: [1, 1]</b>".to_string(),
            }]
        );
    }

    #[test]
    fn disabled_probe_does_nothing() {
        let surface = Arc::new(RecordingSurface::new());
        let probe = DiagnosticProbe::new(spec(), surface.clone(), false);

        assert!(probe.map_clicked(100.0, 100.0).is_none());
        assert!(surface.calls().is_empty());
    }
}
