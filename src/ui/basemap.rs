//! Basemap tile layer for the map canvas.
//!
//! The root tile doubles as the map provider check: its settlement decides
//! whether the surface becomes usable. Other tiles are fetched on demand as
//! they scroll into view and uploaded as textures once.

use crate::geo::{TileId, TilePlacement, TileSettlement, TileSource};
use crate::state::map::MISSING_KEY;
use crate::state::AppState;
use eframe::egui::{self, pos2, Color32, Painter, Rect, TextureHandle, TextureOptions};
use std::collections::HashMap;

/// Tiles kept before off-screen ones are dropped.
const MAX_CACHED_TILES: usize = 256;

enum TileSlot {
    Pending,
    Ready(TextureHandle),
    Failed,
}

pub struct Basemap {
    tile_url: String,
    api_key: Option<String>,
    started: bool,
    slots: HashMap<TileId, TileSlot>,
}

impl Basemap {
    pub fn new(tile_url: String, api_key: Option<String>) -> Self {
        Self {
            tile_url,
            api_key,
            started: false,
            slots: HashMap::new(),
        }
    }

    /// Starts the provider check by fetching the root tile. Without a key
    /// the provider fails immediately.
    pub fn start(&mut self, state: &mut AppState, source: &dyn TileSource) {
        if self.started {
            return;
        }
        self.started = true;

        if self.api_key.is_some() {
            log::info!("Checking map provider");
            self.request(TileId::ROOT, source);
        } else {
            state.handle_map_provider(Err(MISSING_KEY.to_string()));
        }
    }

    fn request(&mut self, tile: TileId, source: &dyn TileSource) {
        let Some(key) = &self.api_key else {
            return;
        };
        let url = tile.url(&self.tile_url, key);
        self.slots.insert(tile, TileSlot::Pending);
        source.request_tile(tile, url);
    }

    /// Stores a fetched tile and resolves the provider check on the root tile.
    pub fn handle_settlement(
        &mut self,
        ctx: &egui::Context,
        settlement: TileSettlement,
        state: &mut AppState,
    ) {
        let tile = settlement.tile;
        if tile == TileId::ROOT {
            state.handle_map_provider(
                settlement
                    .result
                    .as_ref()
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
            );
        }

        let slot = match settlement.result {
            Ok(image) => TileSlot::Ready(ctx.load_texture(
                format!("tile_{}_{}_{}", tile.z, tile.x, tile.y),
                image,
                TextureOptions::LINEAR,
            )),
            Err(e) => {
                log::debug!("Tile {}/{}/{} failed: {}", tile.z, tile.x, tile.y, e);
                TileSlot::Failed
            }
        };
        self.slots.insert(tile, slot);
    }

    /// Requests every placed tile not fetched yet.
    pub fn request_visible(&mut self, placements: &[TilePlacement], source: &dyn TileSource) {
        if self.slots.len() > MAX_CACHED_TILES {
            self.slots.retain(|id, slot| {
                matches!(slot, TileSlot::Pending)
                    || *id == TileId::ROOT
                    || placements.iter().any(|p| p.id == *id)
            });
        }

        for placement in placements {
            if !self.slots.contains_key(&placement.id) {
                self.request(placement.id, source);
            }
        }
    }

    pub fn render(&self, painter: &Painter, placements: &[TilePlacement]) {
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        for placement in placements {
            if let Some(TileSlot::Ready(texture)) = self.slots.get(&placement.id) {
                painter.image(texture.id(), placement.rect, uv, Color32::WHITE);
            }
        }
    }

    /// Returns true if the tile has a texture.
    #[cfg(test)]
    pub fn is_ready(&self, tile: TileId) -> bool {
        matches!(self.slots.get(&tile), Some(TileSlot::Ready(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::tile_test_support::{tile_err, tile_ok, RecordingTileSource};
    use crate::state::MapLoadState;

    const TEMPLATE: &str = "https://tiles.example/{z}/{x}/{y}.jpg?key={key}";

    fn placement(z: u8, x: u32, y: u32) -> TilePlacement {
        TilePlacement {
            id: TileId { z, x, y },
            rect: Rect::from_min_max(pos2(0.0, 0.0), pos2(256.0, 256.0)),
        }
    }

    #[test]
    fn test_missing_key_fails_without_fetch() {
        let source = RecordingTileSource::default();
        let mut state = AppState::new();
        let mut basemap = Basemap::new(TEMPLATE.to_string(), None);

        basemap.start(&mut state, &source);

        assert!(source.requested.borrow().is_empty());
        assert_eq!(state.map_load.load_error(), Some(MISSING_KEY));
    }

    #[test]
    fn test_root_tile_resolves_provider() {
        let ctx = egui::Context::default();
        let source = RecordingTileSource::default();
        let mut state = AppState::new();
        let mut basemap = Basemap::new(TEMPLATE.to_string(), Some("secret".to_string()));

        basemap.start(&mut state, &source);
        basemap.start(&mut state, &source);

        assert_eq!(
            *source.requested.borrow(),
            vec![(
                TileId::ROOT,
                "https://tiles.example/0/0/0.jpg?key=secret".to_string()
            )]
        );
        assert_eq!(state.map_load, MapLoadState::Loading);

        basemap.handle_settlement(&ctx, tile_ok(TileId::ROOT), &mut state);
        assert!(state.map_load.is_loaded());
        assert!(basemap.is_ready(TileId::ROOT));
    }

    #[test]
    fn test_rejected_key_fails_provider() {
        let ctx = egui::Context::default();
        let source = RecordingTileSource::default();
        let mut state = AppState::new();
        let mut basemap = Basemap::new(TEMPLATE.to_string(), Some("revoked".to_string()));

        basemap.start(&mut state, &source);
        basemap.handle_settlement(&ctx, tile_err(TileId::ROOT, 403), &mut state);

        assert_eq!(
            state.map_load.load_error(),
            Some("map provider returned HTTP 403")
        );
        assert!(!basemap.is_ready(TileId::ROOT));
    }

    #[test]
    fn test_visible_tiles_requested_once() {
        let ctx = egui::Context::default();
        let source = RecordingTileSource::default();
        let mut state = AppState::new();
        let mut basemap = Basemap::new(TEMPLATE.to_string(), Some("k".to_string()));
        basemap.start(&mut state, &source);
        basemap.handle_settlement(&ctx, tile_ok(TileId::ROOT), &mut state);

        let placements = vec![placement(8, 70, 121), placement(8, 71, 121)];
        basemap.request_visible(&placements, &source);
        basemap.request_visible(&placements, &source);
        assert_eq!(source.requested.borrow().len(), 3);

        // A failed tile is not retried and does not affect the provider
        let failed = TileId { z: 8, x: 70, y: 121 };
        basemap.handle_settlement(&ctx, tile_err(failed, 404), &mut state);
        basemap.request_visible(&placements, &source);
        assert_eq!(source.requested.borrow().len(), 3);
        assert!(state.map_load.is_loaded());
    }
}
