//! The surface the map animator drives. Anything that can center, zoom, pan,
//! restyle and drop a marker, and that reports when a zoom change has landed.

use crate::geo::{LatLng, LatLngBounds};
use crate::style::StyleSet;

/// Zoom level the flight starts and ends at.
pub const MAX_ZOOM: u8 = 16;

/// Lowest zoom the widget accepts.
pub const MIN_ZOOM: u8 = 3;

/// How the widget reacts to pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureHandling {
    /// Ignores all input, used while a sequence runs.
    #[default]
    None,
    /// Drag pans; wheel zoom needs a modifier key.
    Cooperative,
    /// Drag pans and the wheel zooms.
    Greedy,
}

/// Partial option update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapOptions {
    pub styles: Option<StyleSet>,
    pub gesture_handling: Option<GestureHandling>,
}

impl MapOptions {
    pub fn styles(styles: StyleSet) -> Self {
        Self {
            styles: Some(styles),
            ..Default::default()
        }
    }

    pub fn gestures(gesture_handling: GestureHandling) -> Self {
        Self {
            gesture_handling: Some(gesture_handling),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    /// The widget finished moving to this zoom level.
    ZoomChanged(u8),
}

pub trait MapWidget {
    fn set_options(&mut self, options: MapOptions);

    fn zoom(&self) -> Option<u8>;

    fn set_zoom(&mut self, zoom: u8);

    fn center(&self) -> Option<LatLng>;

    /// Jumps without animation.
    fn set_center(&mut self, center: LatLng);

    /// Glides to `center`.
    fn pan_to(&mut self, center: LatLng);

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f32);

    /// Replaces any existing marker and plays the drop animation.
    fn place_marker(&mut self, at: LatLng);

    /// Plays the attention cue on the existing marker.
    fn bounce_marker(&mut self);

    fn marker(&self) -> Option<LatLng>;

    /// Advances the widget's own animations to `now` (seconds).
    fn tick(&mut self, _now: f64) {}

    /// Drains events raised since the last call.
    fn take_events(&mut self) -> Vec<MapEvent>;
}
