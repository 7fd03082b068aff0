//! Basemap tiles: slippy-map tile addressing and the fetch seam.
//!
//! Tiles are requested through a [`TileSource`] and come back as
//! [`TileSettlement`]s over a [`TileChannel`], the same way analysis
//! requests settle.

use super::projection::{inverse_mercator_y, mercator_y, MapProjection};
use eframe::egui::{ColorImage, Rect};
use geo_types::Coord;
use std::f64::consts::PI;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Upper bound on tiles placed per frame.
const MAX_VISIBLE_TILES: usize = 64;

/// Address of one tile in the provider's `{z}/{x}/{y}` scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// The single tile covering the whole world.
    pub const ROOT: TileId = TileId { z: 0, x: 0, y: 0 };

    /// Fills a `{z}`/`{x}`/`{y}`/`{key}` URL template.
    pub fn url(&self, template: &str, api_key: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
            .replace("{key}", api_key)
    }
}

/// A tile and where it lands on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub id: TileId,
    pub rect: Rect,
}

/// Fractional tile column of a longitude. Not wrapped.
pub fn lon_to_tile_x(lon: f64, z: u8) -> f64 {
    (lon + 180.0) / 360.0 * tile_count(z)
}

/// Fractional tile row of a latitude.
pub fn lat_to_tile_y(lat: f64, z: u8) -> f64 {
    (1.0 - mercator_y(lat) / PI) / 2.0 * tile_count(z)
}

/// North-west corner of tile column `x`, row `y`.
pub fn tile_corner(x: i64, y: i64, z: u8) -> Coord<f64> {
    let n = tile_count(z);
    Coord {
        x: x as f64 / n * 360.0 - 180.0,
        y: inverse_mercator_y(PI * (1.0 - 2.0 * y as f64 / n)),
    }
}

fn tile_count(z: u8) -> f64 {
    (1u64 << z) as f64
}

/// Tiles covering the visible part of the canvas, wrapped across the
/// antimeridian and capped at a fixed count.
pub fn visible_tiles(projection: &MapProjection) -> Vec<TilePlacement> {
    let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
    if ![min_lon, min_lat, max_lon, max_lat]
        .iter()
        .all(|v| v.is_finite())
    {
        return Vec::new();
    }

    let z = projection.tile_zoom();
    let n = 1i64 << z;

    let x0 = lon_to_tile_x(min_lon, z).floor() as i64;
    let x1 = lon_to_tile_x(max_lon, z).floor() as i64;
    let y0 = (lat_to_tile_y(max_lat, z).floor() as i64).max(0);
    let y1 = (lat_to_tile_y(min_lat, z).floor() as i64).min(n - 1);

    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| (x, y)))
        .take(MAX_VISIBLE_TILES)
        .map(|(x, y)| {
            let min = projection.geo_to_screen(tile_corner(x, y, z));
            let max = projection.geo_to_screen(tile_corner(x + 1, y + 1, z));
            TilePlacement {
                id: TileId {
                    z,
                    x: x.rem_euclid(n) as u32,
                    y: y as u32,
                },
                rect: Rect::from_two_pos(min, max),
            }
        })
        .collect()
}

/// Failure of a single tile fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    #[error("network error: {0}")]
    Network(String),

    #[error("map provider returned HTTP {0}")]
    Status(u16),

    #[error("invalid tile image: {0}")]
    Decode(String),
}

/// Decodes PNG or JPEG tile bytes into pixels.
pub fn decode_tile(bytes: &[u8]) -> Result<ColorImage, TileError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| TileError::Decode(e.to_string()))?
        .to_rgba8();
    Ok(ColorImage::from_rgba_unmultiplied(
        [rgba.width() as usize, rgba.height() as usize],
        rgba.as_raw(),
    ))
}

/// The settled outcome of one tile fetch.
pub struct TileSettlement {
    pub tile: TileId,
    pub result: Result<ColorImage, TileError>,
}

/// Something that can fetch basemap tiles.
///
/// `request_tile` must not block; the outcome is delivered later as a
/// [`TileSettlement`].
pub trait TileSource {
    fn request_tile(&self, tile: TileId, url: String);
}

/// Channel carrying tile settlements back to the UI thread.
pub struct TileChannel {
    sender: Sender<TileSettlement>,
    receiver: Receiver<TileSettlement>,
}

impl Default for TileChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl TileChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> Sender<TileSettlement> {
        self.sender.clone()
    }

    /// Non-blocking check for a fetched tile.
    pub fn try_recv(&self) -> Option<TileSettlement> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use eframe::egui::{Pos2, Vec2};
    use std::cell::RefCell;

    /// Tile source that records requests instead of fetching.
    #[derive(Default)]
    pub(crate) struct RecordingTileSource {
        pub(crate) requested: RefCell<Vec<(TileId, String)>>,
    }

    impl TileSource for RecordingTileSource {
        fn request_tile(&self, tile: TileId, url: String) {
            self.requested.borrow_mut().push((tile, url));
        }
    }

    pub(crate) fn tile_ok(tile: TileId) -> TileSettlement {
        TileSettlement {
            tile,
            result: Ok(ColorImage::from_rgba_unmultiplied([2, 2], &[0; 16])),
        }
    }

    pub(crate) fn tile_err(tile: TileId, status: u16) -> TileSettlement {
        TileSettlement {
            tile,
            result: Err(TileError::Status(status)),
        }
    }

    fn projection(lat: f64, lon: f64, zoom: f32) -> MapProjection {
        let mut projection = MapProjection::new(lat, lon);
        projection.update(
            zoom,
            Vec2::ZERO,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(1200.0, 800.0)),
        );
        projection
    }

    #[test]
    fn test_url_template() {
        let tile = TileId { z: 7, x: 35, y: 60 };
        assert_eq!(
            tile.url("https://tiles.example/{z}/{x}/{y}.jpg?key={key}", "abc"),
            "https://tiles.example/7/35/60.jpg?key=abc"
        );
    }

    #[test]
    fn test_tile_of_known_point() {
        // Costa Rica at zoom 7
        let x = lon_to_tile_x(-83.7534, 7).floor();
        let y = lat_to_tile_y(9.7489, 7).floor();
        assert_eq!((x, y), (34.0, 60.0));

        let corner = tile_corner(0, 0, 0);
        assert!((corner.x + 180.0).abs() < 1e-9);
        assert!((corner.y - 85.0511).abs() < 1e-3);
    }

    #[test]
    fn test_visible_tiles_cover_center() {
        let projection = projection(9.7489, -83.7534, 1.0);
        let tiles = visible_tiles(&projection);
        assert!(!tiles.is_empty());

        let center = projection.screen_rect.center();
        assert!(tiles.iter().any(|t| t.rect.contains(center)));
        let z = projection.tile_zoom();
        assert!(tiles.iter().all(|t| t.id.z == z));
    }

    #[test]
    fn test_visible_tiles_wrap_antimeridian() {
        let tiles = visible_tiles(&projection(0.0, 180.0, 1.0));
        let n = 1u32 << tiles[0].id.z;
        assert!(tiles.iter().all(|t| t.id.x < n));
        assert!(tiles.iter().any(|t| t.id.x == 0));
        assert!(tiles.iter().any(|t| t.id.x == n - 1));
    }

    #[test]
    fn test_visible_tiles_capped() {
        let tiles = visible_tiles(&projection(0.0, 0.0, 0.05));
        assert!(tiles.len() <= MAX_VISIBLE_TILES);
        assert!(tiles.iter().all(|t| t.id.y < (1u32 << t.id.z)));
    }

    #[test]
    fn test_decode_tile() {
        assert!(matches!(
            decode_tile(b"not an image"),
            Err(TileError::Decode(_))
        ));
    }
}
