//! Map provider load state and map view (center, zoom, pan).

use eframe::egui::Vec2;

/// Default map center (Costa Rica).
pub const DEFAULT_CENTER_LAT: f64 = 9.7489;
pub const DEFAULT_CENTER_LON: f64 = -83.7534;

/// Reason reported when no map provider key is configured.
pub const MISSING_KEY: &str = "no map provider key configured";

/// Initialization status of the map provider.
///
/// Mirrors the provider's `isLoaded` / `loadError` flags. The state leaves
/// `Loading` once the first basemap tile fetch settles; a failure is
/// terminal for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MapLoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

impl MapLoadState {
    /// Applies the outcome of the provider check. Only a `Loading` state
    /// changes.
    pub fn resolve(&mut self, outcome: Result<(), String>) {
        if *self != Self::Loading {
            return;
        }
        *self = match outcome {
            Ok(()) => Self::Loaded,
            Err(reason) => Self::Failed(reason),
        };
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    pub fn load_error(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Map canvas view parameters.
#[derive(Debug, Clone)]
pub struct MapViewState {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Zoom multiplier (1.0 = regional view)
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
        }
    }
}

impl MapViewState {
    pub fn centered_on(lat: f64, lon: f64) -> Self {
        Self {
            center_lat: lat,
            center_lon: lon,
            ..Default::default()
        }
    }

    /// Restores zoom and pan, keeping the center.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_offset = Vec2::ZERO;
    }
}
