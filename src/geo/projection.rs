//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and
//! screen coordinates for rendering on the canvas. The canvas uses Web
//! Mercator so that basemap tiles line up with the projected points.

use crate::state::map::{DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON};
use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::f64::consts::PI;

/// Half-extent of the view at zoom 1.0, in degrees of longitude.
const DEFAULT_RANGE_DEG: f64 = 2.5;

/// Latitude limit of the Web Mercator square.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Edge length of a basemap tile in screen pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Deepest tile zoom requested from the provider.
pub const MAX_TILE_ZOOM: u8 = 18;

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center latitude of the view
    pub center_lat: f64,
    /// Center longitude of the view
    pub center_lon: f64,
    /// Visible half-range in degrees at zoom 1.0
    pub range_deg: f64,
    /// Current zoom level
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            range_deg: DEFAULT_RANGE_DEG,
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    pub fn new(center_lat: f64, center_lon: f64) -> Self {
        Self {
            center_lat,
            center_lon,
            ..Default::default()
        }
    }

    /// Updates the projection with current view state.
    pub fn update(&mut self, zoom: f32, pan_offset: Vec2, screen_rect: Rect) {
        self.zoom = zoom;
        self.pan_offset = pan_offset;
        self.screen_rect = screen_rect;
    }

    /// Screen pixels per radian of longitude at the current zoom.
    pub fn pixels_per_radian(&self) -> f64 {
        let effective_range = (self.range_deg / self.zoom as f64).to_radians();
        let half_size = self.screen_rect.size().min_elem() as f64 / 2.0;
        half_size / effective_range
    }

    /// Tile zoom whose tiles come closest to [`TILE_SIZE`] on screen.
    pub fn tile_zoom(&self) -> u8 {
        let world_px = 2.0 * PI * self.pixels_per_radian();
        let zoom = (world_px / TILE_SIZE).log2().round();
        if zoom.is_finite() {
            zoom.clamp(0.0, MAX_TILE_ZOOM as f64) as u8
        } else {
            0
        }
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let scale = self.pixels_per_radian();

        let dx = (coord.x - self.center_lon).to_radians() * scale;
        // screen Y grows downward
        let dy = -(mercator_y(coord.y) - mercator_y(self.center_lat)) * scale;

        let center = self.screen_rect.center() + self.pan_offset;
        Pos2::new(center.x + dx as f32, center.y + dy as f32)
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let scale = self.pixels_per_radian();
        let center = self.screen_rect.center() + self.pan_offset;

        let dx = (pos.x - center.x) as f64 / scale;
        let dy = (pos.y - center.y) as f64 / scale;

        Coord {
            x: self.center_lon + dx.to_degrees(),
            y: inverse_mercator_y(mercator_y(self.center_lat) - dy),
        }
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }
}

/// Mercator ordinate (radians) of a latitude, clamped to the Mercator square.
pub fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

/// Latitude (degrees) of a Mercator ordinate.
pub fn inverse_mercator_y(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}

/// Clamps latitude to [-90, 90] and wraps longitude into [-180, 180).
pub fn normalize_coord(coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (coord.x + 180.0).rem_euclid(360.0) - 180.0,
        y: coord.y.clamp(-90.0, 90.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> MapProjection {
        let mut projection = MapProjection::default();
        projection.update(
            2.0,
            Vec2::new(15.0, -10.0),
            Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 500.0)),
        );
        projection
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let projection = projection();
        let pos = projection.geo_to_screen(Coord {
            x: DEFAULT_CENTER_LON,
            y: DEFAULT_CENTER_LAT,
        });
        let expected = projection.screen_rect.center() + projection.pan_offset;
        assert!((pos - expected).length() < 0.01);
    }

    #[test]
    fn test_screen_geo_round_trip() {
        let projection = projection();
        let pos = Pos2::new(321.0, 123.0);
        let back = projection.geo_to_screen(projection.screen_to_geo(pos));
        assert!((back - pos).length() < 0.05);
    }

    #[test]
    fn test_north_is_up() {
        let projection = projection();
        let north = projection.geo_to_screen(Coord {
            x: DEFAULT_CENTER_LON,
            y: DEFAULT_CENTER_LAT + 1.0,
        });
        let south = projection.geo_to_screen(Coord {
            x: DEFAULT_CENTER_LON,
            y: DEFAULT_CENTER_LAT - 1.0,
        });
        assert!(north.y < south.y);
    }

    #[test]
    fn test_normalize_coord() {
        let coord = normalize_coord(Coord { x: 190.0, y: 95.0 });
        assert!((coord.x - -170.0).abs() < 1e-9);
        assert_eq!(coord.y, 90.0);

        let coord = normalize_coord(Coord {
            x: -83.7534,
            y: 9.7489,
        });
        assert!((coord.x - -83.7534).abs() < 1e-9);
        assert_eq!(coord.y, 9.7489);

        let coord = normalize_coord(Coord { x: -540.0, y: -91.0 });
        assert!((coord.x - -180.0).abs() < 1e-9);
        assert_eq!(coord.y, -90.0);
    }

    #[test]
    fn test_polar_center_stays_finite() {
        let mut projection = MapProjection::new(90.0, 0.0);
        projection.update(
            1.0,
            Vec2::ZERO,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(1200.0, 800.0)),
        );

        let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
        assert!(max_lon - min_lon < 10.0);
        assert!(max_lat < 90.0);
        assert!(min_lat.is_finite());
    }

    #[test]
    fn test_mercator_inverse() {
        for lat in [-80.0, -9.7489, 0.0, 9.7489, 45.0, 80.0] {
            assert!((inverse_mercator_y(mercator_y(lat)) - lat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tile_zoom_follows_view_zoom() {
        let mut projection = projection();
        let regional = projection.tile_zoom();
        projection.zoom = 16.0;
        assert_eq!(projection.tile_zoom(), regional + 3);
        projection.zoom = 1e6;
        assert_eq!(projection.tile_zoom(), MAX_TILE_ZOOM);
    }
}
