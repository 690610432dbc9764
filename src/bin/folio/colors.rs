//! Color constants for the map layer and the drawer.

use eframe::egui::Color32;

// Map layer
pub const MAP_BACKGROUND: Color32 = Color32::from_rgb(24, 30, 40);
pub const GRATICULE: Color32 = Color32::from_rgba_premultiplied(60, 70, 90, 90);
pub const COASTLINE: Color32 = Color32::from_rgb(110, 130, 160);
pub const ROAD: Color32 = Color32::from_rgb(200, 150, 70);
pub const CITY_DOT: Color32 = Color32::from_rgb(220, 220, 230);

// Labels
pub const LABEL_TEXT: Color32 = Color32::from_rgba_premultiplied(235, 235, 240, 230);
pub const LABEL_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
pub const ROAD_LABEL_TEXT: Color32 = Color32::from_rgb(240, 200, 130);

// Marker
pub const MARKER_FILL: Color32 = Color32::from_rgb(230, 70, 70);
pub const MARKER_STROKE: Color32 = Color32::from_rgb(120, 20, 20);
pub const MARKER_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 110);

// Drawer
pub const DRAG_HANDLE: Color32 = Color32::from_rgba_premultiplied(120, 120, 130, 120);
pub const DRAG_HANDLE_ACTIVE: Color32 = Color32::from_rgb(90, 140, 230);
