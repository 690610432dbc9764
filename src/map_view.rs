//! In-process vector map: a Web Mercator camera over the embedded atlas.
//!
//! The view owns the camera math and animation timing. Painting lives in the
//! binary, which asks the view where things are via [`MapView::project`].

use crate::Atlas;
use crate::easing::{ease_in_out_cubic, ease_out_quart, lerp, progress};
use crate::geo::{LatLng, LatLngBounds, world_scale};
use crate::style::StyleSet;
use crate::widget::{GestureHandling, MAX_ZOOM, MIN_ZOOM, MapEvent, MapOptions, MapWidget};
use std::sync::Arc;
use thiserror::Error;

/// Duration of a single zoom level change.
pub const ZOOM_ANIMATION_SECS: f64 = 0.2;

/// Duration of a `pan_to` glide.
pub const PAN_SECS: f64 = 1.2;

/// Duration of the marker drop.
pub const MARKER_DROP_SECS: f64 = 0.6;

/// Duration of the marker bounce cue.
pub const MARKER_BOUNCE_SECS: f64 = 1.4;

/// Height the marker falls from, in pixels.
const MARKER_DROP_HEIGHT: f64 = 240.0;

/// Peak height of each bounce hop, in pixels.
const MARKER_BOUNCE_HEIGHT: f64 = 18.0;

/// Number of hops in one bounce cue.
const MARKER_BOUNCE_HOPS: f64 = 3.0;

const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 720.0);

/// Errors that keep the map from coming up.
#[derive(Error, Debug)]
pub enum MapLoadError {
    #[error("atlas unavailable: {0}")]
    AtlasUnavailable(String),
    #[error("atlas has no land outlines")]
    EmptyAtlas,
    #[error("invalid starting center {0:?}")]
    InvalidCenter(LatLng),
}

struct ZoomTween {
    from: f64,
    start: f64,
}

struct PanTween {
    from: (f64, f64),
    to: (f64, f64),
    start: f64,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    position: LatLng,
    placed_at: f64,
    bounce_started: Option<f64>,
}

pub struct MapView {
    atlas: Arc<Atlas>,
    now: f64,
    /// Target zoom level; `display_zoom` eases toward it
    zoom: u8,
    display_zoom: f64,
    zoom_tween: Option<ZoomTween>,
    /// Camera center in normalized world coordinates
    center: (f64, f64),
    pan: Option<PanTween>,
    styles: StyleSet,
    gestures: GestureHandling,
    viewport: (f64, f64),
    marker: Option<Marker>,
    events: Vec<MapEvent>,
}

impl MapView {
    pub fn new(atlas: Arc<Atlas>, center: LatLng, zoom: u8) -> Result<Self, MapLoadError> {
        if atlas.land.is_empty() {
            return Err(MapLoadError::EmptyAtlas);
        }
        if !center.is_valid() {
            return Err(MapLoadError::InvalidCenter(center));
        }

        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Ok(Self {
            atlas,
            now: 0.0,
            zoom,
            display_zoom: f64::from(zoom),
            zoom_tween: None,
            center: center.to_world(),
            pan: None,
            styles: StyleSet::Initial,
            gestures: GestureHandling::None,
            viewport: DEFAULT_VIEWPORT,
            marker: None,
            events: Vec::new(),
        })
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn styles(&self) -> StyleSet {
        self.styles
    }

    pub fn gesture_handling(&self) -> GestureHandling {
        self.gestures
    }

    pub fn display_zoom(&self) -> f64 {
        self.display_zoom
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.viewport = (width, height);
        }
    }

    /// Pixel offset of `point` from the viewport center at the current display zoom.
    pub fn project(&self, point: LatLng) -> (f64, f64) {
        let (x, y) = point.to_world();
        let scale = world_scale(self.display_zoom);
        ((x - self.center.0) * scale, (y - self.center.1) * scale)
    }

    /// True while any camera or marker animation still needs frames.
    pub fn is_moving(&self) -> bool {
        self.zoom_tween.is_some()
            || self.pan.is_some()
            || self.marker.is_some_and(|marker| {
                self.now - marker.placed_at < MARKER_DROP_SECS
                    || marker
                        .bounce_started
                        .is_some_and(|start| self.now - start < MARKER_BOUNCE_SECS)
            })
    }

    /// Marker position with its current lift above the ground, in pixels.
    pub fn marker_lift(&self) -> Option<(LatLng, f64)> {
        let marker = self.marker?;

        let drop = progress(marker.placed_at, MARKER_DROP_SECS, self.now);
        let mut lift = MARKER_DROP_HEIGHT * (1.0 - ease_out_quart(drop));

        if let Some(start) = marker.bounce_started {
            let t = progress(start, MARKER_BOUNCE_SECS, self.now);
            let hop = (t * MARKER_BOUNCE_HOPS * std::f64::consts::PI).sin().abs();
            lift += MARKER_BOUNCE_HEIGHT * hop * (1.0 - t);
        }

        Some((marker.position, lift))
    }

    /// Drag panning, honored only when gestures are enabled.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if self.gestures == GestureHandling::None {
            return;
        }
        self.pan = None;
        let scale = world_scale(self.display_zoom);
        self.center.0 = (self.center.0 - dx / scale).clamp(0.0, 1.0);
        self.center.1 = (self.center.1 - dy / scale).clamp(0.0, 1.0);
    }

    /// Wheel zoom. Cooperative handling needs the modifier key held.
    pub fn wheel_zoom(&mut self, steps: i32, modifier_held: bool) -> bool {
        let allowed = match self.gestures {
            GestureHandling::None => false,
            GestureHandling::Cooperative => modifier_held,
            GestureHandling::Greedy => true,
        };
        if !allowed || steps == 0 {
            return false;
        }

        let target = (i32::from(self.zoom) + steps).clamp(i32::from(MIN_ZOOM), i32::from(MAX_ZOOM));
        self.set_zoom(target as u8);
        true
    }
}

impl MapWidget for MapView {
    fn set_options(&mut self, options: MapOptions) {
        if let Some(styles) = options.styles {
            self.styles = styles;
        }
        if let Some(gestures) = options.gesture_handling {
            self.gestures = gestures;
        }
    }

    fn zoom(&self) -> Option<u8> {
        Some(self.zoom)
    }

    fn set_zoom(&mut self, zoom: u8) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom == self.zoom {
            return;
        }
        self.zoom = zoom;
        self.zoom_tween = Some(ZoomTween {
            from: self.display_zoom,
            start: self.now,
        });
    }

    fn center(&self) -> Option<LatLng> {
        Some(LatLng::from_world(self.center.0, self.center.1))
    }

    fn set_center(&mut self, center: LatLng) {
        self.pan = None;
        self.center = center.to_world();
    }

    fn pan_to(&mut self, center: LatLng) {
        self.pan = Some(PanTween {
            from: self.center,
            to: center.to_world(),
            start: self.now,
        });
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f32) {
        let zoom = bounds.fit_zoom(self.viewport, f64::from(padding), MIN_ZOOM, MAX_ZOOM);

        self.pan = None;
        self.center = bounds.center().to_world();
        self.zoom_tween = None;
        self.display_zoom = f64::from(zoom);

        if zoom != self.zoom {
            self.zoom = zoom;
            self.events.push(MapEvent::ZoomChanged(zoom));
        }
    }

    fn place_marker(&mut self, at: LatLng) {
        self.marker = Some(Marker {
            position: at,
            placed_at: self.now,
            bounce_started: None,
        });
    }

    fn bounce_marker(&mut self) {
        if let Some(marker) = &mut self.marker {
            marker.bounce_started = Some(self.now);
        }
    }

    fn marker(&self) -> Option<LatLng> {
        self.marker.map(|marker| marker.position)
    }

    fn tick(&mut self, now: f64) {
        self.now = now;

        if let Some(tween) = &self.zoom_tween {
            let t = progress(tween.start, ZOOM_ANIMATION_SECS, now);
            self.display_zoom = lerp(tween.from, f64::from(self.zoom), ease_out_quart(t));
            if t >= 1.0 {
                self.display_zoom = f64::from(self.zoom);
                self.zoom_tween = None;
                self.events.push(MapEvent::ZoomChanged(self.zoom));
            }
        }

        if let Some(pan) = &self.pan {
            let t = ease_in_out_cubic(progress(pan.start, PAN_SECS, now));
            self.center = (lerp(pan.from.0, pan.to.0, t), lerp(pan.from.1, pan.to.1, t));
            if t >= 1.0 {
                self.center = pan.to;
                self.pan = None;
            }
        }
    }

    fn take_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> Arc<Atlas> {
        Arc::new(Atlas {
            land: vec![vec![
                LatLng::new(49.0, -125.0),
                LatLng::new(49.0, -67.0),
                LatLng::new(25.0, -80.0),
            ]],
            ..Default::default()
        })
    }

    fn view() -> MapView {
        MapView::new(atlas(), LatLng::new(41.0437, -74.2156), MAX_ZOOM).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_atlas() {
        let result = MapView::new(Arc::new(Atlas::default()), LatLng::new(0.0, 0.0), 10);
        assert!(matches!(result, Err(MapLoadError::EmptyAtlas)));

        let result = MapView::new(atlas(), LatLng::new(100.0, 0.0), 10);
        assert!(matches!(result, Err(MapLoadError::InvalidCenter(_))));
    }

    #[test]
    fn test_zoom_change_is_acknowledged_after_animation() {
        let mut view = view();
        view.tick(1.0);
        view.set_zoom(15);
        assert_eq!(view.zoom(), Some(15));
        assert!(view.take_events().is_empty());

        view.tick(1.1);
        assert!(view.take_events().is_empty());
        assert!(view.display_zoom() < 16.0 && view.display_zoom() > 15.0);

        view.tick(1.0 + ZOOM_ANIMATION_SECS);
        assert_eq!(view.take_events(), vec![MapEvent::ZoomChanged(15)]);
        assert_eq!(view.display_zoom(), 15.0);
    }

    #[test]
    fn test_set_zoom_to_current_level_raises_nothing() {
        let mut view = view();
        view.set_zoom(MAX_ZOOM);
        view.set_zoom(MAX_ZOOM + 4);
        view.tick(5.0);
        assert!(view.take_events().is_empty());
    }

    #[test]
    fn test_pan_to_glides_then_lands() {
        let mut view = view();
        let target = LatLng::new(34.0598, -84.2456);
        view.tick(0.0);
        view.pan_to(target);

        view.tick(PAN_SECS / 2.0);
        let midway = view.center().unwrap();
        assert!(midway.lng < -74.2156 && midway.lng > -84.2456);

        view.tick(PAN_SECS);
        let landed = view.center().unwrap();
        assert!((landed.lat - target.lat).abs() < 1e-9);
        assert!((landed.lng - target.lng).abs() < 1e-9);
        assert!(!view.is_moving());
    }

    #[test]
    fn test_fit_bounds_jumps_and_reports_zoom() {
        let mut view = view();
        let bounds = LatLngBounds::from_points(
            LatLng::new(41.0437, -74.2156),
            LatLng::new(34.0598, -84.2456),
        );
        view.fit_bounds(bounds, 100.0);
        assert_eq!(view.zoom(), Some(6));
        assert_eq!(view.take_events(), vec![MapEvent::ZoomChanged(6)]);

        let (x, y) = view.project(bounds.center());
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
    }

    #[test]
    fn test_gestures_gate_user_input() {
        let mut view = view();
        let before = view.center();
        view.pan_by(50.0, 0.0);
        assert_eq!(view.center(), before);
        assert!(!view.wheel_zoom(-1, true));

        view.set_options(MapOptions::gestures(GestureHandling::Cooperative));
        assert!(!view.wheel_zoom(-1, false));
        assert!(view.wheel_zoom(-1, true));
        assert_eq!(view.zoom(), Some(15));

        view.pan_by(50.0, 0.0);
        assert_ne!(view.center(), before);
    }

    #[test]
    fn test_marker_drop_then_bounce() {
        let mut view = view();
        let at = LatLng::new(34.0598, -84.2456);
        view.tick(2.0);
        view.bounce_marker();
        assert!(view.marker().is_none());

        view.place_marker(at);
        let (_, lift) = view.marker_lift().unwrap();
        assert!((lift - MARKER_DROP_HEIGHT).abs() < 1e-9);

        view.tick(2.0 + MARKER_DROP_SECS);
        let (position, lift) = view.marker_lift().unwrap();
        assert_eq!(position, at);
        assert!(lift.abs() < 1e-9);

        view.bounce_marker();
        view.tick(2.0 + MARKER_DROP_SECS + MARKER_BOUNCE_SECS / 6.0);
        let (_, lift) = view.marker_lift().unwrap();
        assert!(lift > 0.0);
        assert_eq!(view.marker(), Some(at));
    }
}
