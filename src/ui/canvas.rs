//! Central canvas UI: basemap with click-to-select and the selection marker.

use crate::geo::{self, MapProjection, TileSource};
use crate::state::AppState;
use crate::ui::basemap::Basemap;
use crate::ui::colors;
use eframe::egui::{self, Rect, RichText, Sense, Vec2};

pub fn render_canvas(
    ui: &mut egui::Ui,
    state: &mut AppState,
    basemap: &mut Basemap,
    tiles: &dyn TileSource,
) {
    let available_size = ui.available_size();
    let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
    let rect = response.rect;

    painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

    let mut projection = MapProjection::new(state.map_view.center_lat, state.map_view.center_lon);
    projection.update(state.map_view.zoom, state.map_view.pan_offset, rect);

    let placements = geo::visible_tiles(&projection);
    basemap.request_visible(&placements, tiles);
    basemap.render(&painter, &placements);

    geo::render_graticule(&painter, &projection);

    if let Some(point) = state.selection.selection() {
        geo::render_marker(&painter, &projection, point);
    }

    draw_overlay_info(ui, &rect, state);

    // A click without drag selects the point under the cursor
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let coord = geo::normalize_coord(projection.screen_to_geo(pos));
            state.handle_map_click(coord.y, coord.x);
        }
    }

    handle_canvas_interaction(&response, &rect, state);
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, state: &AppState) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(220.0, 40.0));

    let text = match state.selection.selection() {
        Some(point) => format!("{:.4}, {:.4}", point.latitude, point.longitude),
        None => "Click the map to select a location".to_string(),
    };

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.label(
            RichText::new(text)
                .monospace()
                .size(12.0)
                .color(colors::canvas::OVERLAY_TEXT),
        );
    });
}

fn handle_canvas_interaction(response: &egui::Response, rect: &Rect, state: &mut AppState) {
    if response.dragged() {
        state.map_view.pan_offset += response.drag_delta();
    }

    // Zoom relative to cursor position
    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            let zoom_factor = 1.0 + scroll_delta.y * 0.001;
            let old_zoom = state.map_view.zoom;
            let new_zoom = (old_zoom * zoom_factor).clamp(0.05, 50.0);

            if let Some(cursor_pos) = response.hover_pos() {
                let cursor_rel = cursor_pos - rect.center();
                let ratio = new_zoom / old_zoom;
                state.map_view.pan_offset =
                    cursor_rel * (1.0 - ratio) + state.map_view.pan_offset * ratio;
            }

            state.map_view.zoom = new_zoom;
        }
    }

    if response.double_clicked() {
        state.map_view.reset();
    }
}
