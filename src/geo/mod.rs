//! Map projection, basemap tiles and canvas rendering.
//!
//! The canvas is a Web Mercator view: basemap tiles are placed by the
//! projection, clicks are converted to a latitude/longitude pair and the
//! current selection is drawn as a marker.

mod projection;
mod renderer;
mod tiles;

pub use projection::{normalize_coord, MapProjection};
pub use renderer::{render_graticule, render_marker};
pub use tiles::{
    decode_tile, visible_tiles, TileChannel, TileError, TileId, TilePlacement, TileSettlement,
    TileSource,
};

#[cfg(test)]
pub(crate) use tiles::tests as tile_test_support;
