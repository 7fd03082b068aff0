//! Map canvas rendering: graticule and selection marker.

use super::MapProjection;
use crate::state::SpatialSelection;
use crate::ui::colors;
use eframe::egui::{Align2, FontId, Painter, Pos2, Stroke, Vec2};
use geo_types::Coord;

/// Picks a graticule spacing that yields a handful of lines on screen.
pub fn graticule_step(span_deg: f64) -> f64 {
    const STEPS: [f64; 8] = [0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];
    STEPS
        .iter()
        .copied()
        .find(|step| span_deg / step <= 12.0)
        .unwrap_or(30.0)
}

/// Upper bound on graticule lines drawn per axis.
pub const MAX_GRATICULE_LINES: usize = 48;

/// Multiples of `step` covering `[min, max]`, at most [`MAX_GRATICULE_LINES`].
pub fn graticule_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let first = (min / step).floor() as i64;
    (0..MAX_GRATICULE_LINES as i64)
        .map(|i| (first + i) as f64 * step)
        .take_while(|value| *value <= max)
        .collect()
}

/// Draws latitude/longitude lines with degree labels.
pub fn render_graticule(painter: &Painter, projection: &MapProjection) {
    let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
    let step = graticule_step((max_lon - min_lon).max(max_lat - min_lat));
    let stroke = Stroke::new(0.5, colors::canvas::GRATICULE);
    let font_id = FontId::proportional(10.0);
    let rect = projection.screen_rect;

    for lon in graticule_values(min_lon, max_lon, step) {
        let x = projection.geo_to_screen(Coord { x: lon, y: min_lat }).x;
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            stroke,
        );
        painter.text(
            Pos2::new(x, rect.bottom()) + Vec2::new(2.0, -2.0),
            Align2::LEFT_BOTTOM,
            format!("{:.2}°", lon),
            font_id.clone(),
            colors::canvas::GRATICULE_LABEL,
        );
    }

    for lat in graticule_values(min_lat, max_lat, step) {
        let y = projection.geo_to_screen(Coord { x: min_lon, y: lat }).y;
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            stroke,
        );
        painter.text(
            Pos2::new(rect.left(), y) + Vec2::new(2.0, -2.0),
            Align2::LEFT_BOTTOM,
            format!("{:.2}°", lat),
            font_id.clone(),
            colors::canvas::GRATICULE_LABEL,
        );
    }
}

/// Draws the selection marker as a pin at the selected point.
pub fn render_marker(painter: &Painter, projection: &MapProjection, point: SpatialSelection) {
    let pos = projection.geo_to_screen(Coord {
        x: point.longitude,
        y: point.latitude,
    });

    painter.circle_filled(pos, 5.0, colors::canvas::MARKER);
    painter.circle_stroke(pos, 5.0, Stroke::new(1.5, colors::canvas::MARKER_OUTLINE));
    painter.text(
        pos,
        Align2::CENTER_BOTTOM,
        egui_phosphor::regular::MAP_PIN,
        FontId::proportional(24.0),
        colors::canvas::MARKER,
    );
}
