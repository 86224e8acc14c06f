// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// World image - one static 4096x4096 background, served from the assets dir
pub const MAP_IMAGE: &str = "assets/world-map.webp";
pub const IMAGE_WIDTH: f64 = 4096.0;
pub const IMAGE_HEIGHT: f64 = 4096.0;

// Printed grid labels run 0..59 across and 0..59 down => 60 x 60 squares
pub const GRID_COLS: u32 = 60;
pub const GRID_ROWS: u32 = 60;

// Transition timing - CRITICAL: these must stay in sync with the CSS
// animation durations in frontend/style.css
pub const DOORS_OPEN_DELAY_MS: u64 = 5_600;
pub const NAVIGATE_DELAY_MS: u64 = 11_000;
pub const TRANSITION_DESTINATION: &str = "velis.html";
pub const ABYSS_IMAGE: &str = "assets/velis/abyss.webp";
