use serde::{Deserialize, Serialize};

/// A single square in the uniform partition of the world image, addressed
/// by zero-based (col, row) as printed on the physical map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub col: u32,
    pub row: u32,
}

impl GridCell {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Continuous position in the image's own pixel space, as consumed by the
/// Leaflet CRS.Simple marker and viewport APIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayCoordinate {
    pub x: f64,
    pub y: f64,
}

/// Dimensions of the world image together with its grid resolution.
///
/// All coordinate conversion goes through this struct so that the image
/// size and grid counts are fixed in exactly one place.
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
    pub image_width: f64,
    pub image_height: f64,
}

impl GridSpec {
    pub fn new(cols: u32, rows: u32, image_width: f64, image_height: f64) -> Self {
        debug_assert!(cols > 0 && rows > 0, "grid must have at least one cell");
        Self {
            cols,
            rows,
            image_width,
            image_height,
        }
    }

    pub fn cell_width(&self) -> f64 {
        self.image_width / self.cols as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.image_height / self.rows as f64
    }

    /// Converts a grid cell to the display coordinate centred in that cell.
    ///
    /// An out-of-range cell is an authoring mistake, not a runtime fault:
    /// it simply produces a coordinate outside the image, which the display
    /// layer clips.
    pub fn to_display_coordinate(&self, cell: GridCell) -> DisplayCoordinate {
        DisplayCoordinate {
            x: (cell.col as f64 + 0.5) * self.cell_width(),
            y: (cell.row as f64 + 0.5) * self.cell_height(),
        }
    }

    /// Reverse-maps a continuous pixel position to the grid cell that
    /// contains it. Not the mathematical inverse of the forward mapping
    /// (forward centres, this floors), but a cell-centre always floors back
    /// to its own cell.
    pub fn to_grid_cell(&self, x: f64, y: f64) -> GridCell {
        GridCell {
            col: (x / self.cell_width()).floor().max(0.0) as u32,
            row: (y / self.cell_height()).floor().max(0.0) as u32,
        }
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.col < self.cols && cell.row < self.rows
    }
}
