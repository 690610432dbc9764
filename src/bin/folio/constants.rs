/// Initial window size when no size is given on the command line.
pub const DEFAULT_WINDOW_SIZE: [f32; 2] = [1280.0, 720.0];

/// Width of the grab strip on the drawer's inner edge.
pub const DRAG_HANDLE_WIDTH: f32 = 8.0;

/// Size of the tab shown while the drawer is collapsed.
pub const COLLAPSED_TAB_SIZE: [f32; 2] = [36.0, 120.0];

/// Fade time of the hero text and the map layer.
pub const LAYER_FADE_SECS: f32 = 0.3;

pub const LOGO_HEIGHT: f32 = 48.0;
pub const CITY_IMAGE_HEIGHT: f32 = 140.0;

/// Radius of the map marker head in pixels.
pub const MARKER_RADIUS: f32 = 9.0;

/// Spacing of the background grid, in degrees.
pub const GRATICULE_STEP_DEG: f64 = 10.0;

/// Labels further than this outside the viewport are skipped.
pub const LABEL_CULL_MARGIN: f32 = 60.0;
