//! Geographic coordinates and Web Mercator helpers.

use serde::{Deserialize, Serialize};

/// Latitude limit of the square Web Mercator world.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Approximate longitude span of the continental US (125°W to 67°W).
pub const US_WIDTH_DEG: f64 = 58.0;

/// Size of one world tile at zoom 0, in pixels.
pub const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Absolute longitude difference, the only distance the flight script cares about.
    pub fn longitude_span(&self, other: &LatLng) -> f64 {
        (other.lng - self.lng).abs()
    }

    /// Projects to normalized world coordinates in [0, 1] x [0, 1].
    pub fn to_world(&self) -> (f64, f64) {
        let x = (self.lng + 180.0) / 360.0;
        let lat = self.lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0;
        (x, y)
    }

    pub fn from_world(x: f64, y: f64) -> Self {
        let lng = x * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * y);
        let lat = n.sinh().atan().to_degrees();
        Self { lat, lng }
    }
}

/// Axis aligned lat/lng box, grown point by point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn from_points(a: LatLng, b: LatLng) -> Self {
        let mut bounds = Self::from_point(a);
        bounds.extend(b);
        bounds
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Center in projected space, so it matches what the camera shows.
    pub fn center(&self) -> LatLng {
        let (x0, y0) = self.south_west.to_world();
        let (x1, y1) = self.north_east.to_world();
        LatLng::from_world((x0 + x1) / 2.0, (y0 + y1) / 2.0)
    }

    /// Largest integer zoom at which the box fits in `viewport` with `padding` on every side.
    pub fn fit_zoom(&self, viewport: (f64, f64), padding: f64, min_zoom: u8, max_zoom: u8) -> u8 {
        let (x0, y0) = self.south_west.to_world();
        let (x1, y1) = self.north_east.to_world();
        let span_x = (x1 - x0).abs();
        let span_y = (y1 - y0).abs();

        let usable_w = (viewport.0 - 2.0 * padding).max(1.0);
        let usable_h = (viewport.1 - 2.0 * padding).max(1.0);

        let zoom_for = |span: f64, usable: f64| {
            if span <= f64::EPSILON {
                f64::from(max_zoom)
            } else {
                (usable / (span * TILE_SIZE)).log2()
            }
        };

        let zoom = zoom_for(span_x, usable_w).min(zoom_for(span_y, usable_h)).floor();
        zoom.clamp(f64::from(min_zoom), f64::from(max_zoom)) as u8
    }
}

/// World pixels per normalized world unit at a (possibly fractional) zoom.
pub fn world_scale(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}
