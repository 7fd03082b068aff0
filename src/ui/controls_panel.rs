//! Controls panel UI: date range pickers and the submit button.

use crate::analysis::Transport;
use crate::state::AppState;
use crate::ui::colors;
use eframe::egui::{self, RichText};
use egui_extras::DatePickerButton;

pub fn render_controls_panel(ctx: &egui::Context, state: &mut AppState, transport: &dyn Transport) {
    egui::SidePanel::left("controls_panel")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .max_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Analysis");
            ui.separator();

            render_date_section(ui, state);

            ui.add_space(10.0);

            ui.horizontal(|ui| {
                // Stays enabled while pending: each click issues a new request
                if ui.button("Fetch Image & Predict").clicked() {
                    if let Err(e) = state.handle_submit(transport) {
                        log::debug!("Submission not sent: {}", e);
                    }
                }
                if state.coordinator.is_pending() {
                    ui.spinner();
                }
            });

            if state.coordinator.in_flight() > 1 {
                ui.label(
                    RichText::new(format!(
                        "{} requests in flight; showing the newest",
                        state.coordinator.in_flight()
                    ))
                    .small()
                    .color(colors::ui::LABEL),
                );
            }
        });
}

fn render_date_section(ui: &mut egui::Ui, state: &mut AppState) {
    let mut range = state.selection.range();

    egui::Grid::new("date_range_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Start Date:").color(colors::ui::LABEL));
            ui.add(DatePickerButton::new(&mut range.start).id_salt("start_date"));
            ui.end_row();

            ui.label(RichText::new("End Date:").color(colors::ui::LABEL));
            ui.add(DatePickerButton::new(&mut range.end).id_salt("end_date"));
            ui.end_row();
        });

    let current = state.selection.range();
    if range.start != current.start {
        state.handle_start_date(range.start);
    }
    if range.end != current.end {
        state.handle_end_date(range.end);
    }

    if !state.selection.range().is_ordered() {
        ui.label(
            RichText::new("Start date is after end date")
                .small()
                .color(colors::ui::WARNING),
        );
    }
}
