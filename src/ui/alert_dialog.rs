//! Modal dialog for user alerts.

use crate::state::{AppState, SurfaceView};
use eframe::egui::{self, RichText};

pub fn render_alert_dialog(ctx: &egui::Context, state: &mut AppState) {
    let SurfaceView::Ready {
        alert: Some(alert),
        ..
    } = state.surface()
    else {
        return;
    };
    let alert = alert.clone();

    let mut dismissed = false;
    let modal = egui::Modal::new(egui::Id::new("user_alert")).show(ctx, |ui| {
        ui.set_max_width(320.0);
        ui.label(
            RichText::new(alert.kind.label())
                .strong()
                .size(16.0)
                .color(alert.kind.color()),
        );
        ui.add_space(6.0);
        ui.label(&alert.message);
        ui.add_space(10.0);
        if ui.button("OK").clicked() {
            dismissed = true;
        }
    });

    if dismissed || modal.should_close() {
        state.dismiss_alert();
    }
}

/// Full-surface indicator shown while the map provider is not usable.
pub fn render_blocking_message(ctx: &egui::Context, text: &str, color: egui::Color32) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(text).size(20.0).color(color));
        });
    });
}
