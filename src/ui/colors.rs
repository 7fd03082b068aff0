//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(140, 150, 140);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(200, 210, 200);
    /// Emphasized color for active states.
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 180, 255);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// Non-blocking warning hint.
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 50);
    /// Blocking error.
    pub const ERROR: Color32 = Color32::from_rgb(255, 80, 80);
}

/// Page theme.
pub mod theme {
    use super::Color32;

    /// Forest green page background.
    pub const BACKGROUND: Color32 = Color32::from_rgb(0x13, 0x3C, 0x12);
    /// Title bar background.
    pub const BAR: Color32 = Color32::BLACK;
    /// Border around the prediction mask.
    pub const MASK_BORDER: Color32 = Color32::from_rgb(0xCC, 0xCC, 0xCC);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background color.
    pub const BACKGROUND: Color32 = Color32::from_rgb(18, 36, 28);
    /// Latitude/longitude lines, translucent over the basemap.
    pub const GRATICULE: Color32 = Color32::from_rgba_premultiplied(60, 60, 60, 60);
    /// Degree labels on the graticule.
    pub const GRATICULE_LABEL: Color32 = Color32::from_rgb(110, 140, 120);
    /// Selected point marker.
    pub const MARKER: Color32 = Color32::from_rgb(235, 70, 60);
    /// Selected point marker outline.
    pub const MARKER_OUTLINE: Color32 = Color32::from_rgb(120, 20, 20);
    /// Overlay text.
    pub const OVERLAY_TEXT: Color32 = Color32::from_rgb(200, 220, 200);
}
