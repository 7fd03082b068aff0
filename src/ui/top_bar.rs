//! Top bar UI: app title, selection summary, and status.

use crate::analysis::RequestStatus;
use crate::state::{AppState, SurfaceView};
use crate::ui::colors;
use eframe::egui::{self, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) {
    let (marker, pending) = match state.surface() {
        SurfaceView::Ready {
            marker, pending, ..
        } => (marker, pending),
        _ => (None, false),
    };

    egui::TopBottomPanel::top("top_bar")
        .exact_height(40.0)
        .frame(egui::Frame::new().fill(colors::theme::BAR).inner_margin(8.0))
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("Deforestation Analysis Tool")
                        .strong()
                        .size(18.0)
                        .color(egui::Color32::WHITE),
                );

                ui.separator();

                let (location, color) = match marker {
                    Some(point) => (
                        format!("{:.4}, {:.4}", point.latitude, point.longitude),
                        colors::ui::VALUE,
                    ),
                    None => ("No location".to_string(), colors::ui::LABEL),
                };
                ui.label(RichText::new("Location:").size(12.0).color(colors::ui::LABEL));
                ui.label(RichText::new(location).monospace().size(12.0).color(color));

                ui.separator();

                let status_color = match state.coordinator.status() {
                    _ if pending => colors::ui::ACTIVE,
                    RequestStatus::Idle | RequestStatus::Pending => colors::ui::LABEL,
                    RequestStatus::Settled => colors::ui::SUCCESS,
                };
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(status_color),
                );
            });
        });
}
