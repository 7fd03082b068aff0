//! Results panel UI: source image and prediction mask side by side.

use crate::analysis::ImageSource;
use crate::state::{AppState, SurfaceView};
use crate::ui::colors;
use crate::ui::textures::{DecodedTexture, ResultTextureCache};
use eframe::egui::{self, RichText, Stroke};

const MAX_IMAGE_WIDTH: f32 = 400.0;

/// Renders nothing until a request has succeeded.
pub fn render_results_panel(
    ctx: &egui::Context,
    state: &AppState,
    textures: &mut ResultTextureCache,
) {
    let SurfaceView::Ready {
        images: Some(result),
        ..
    } = state.surface()
    else {
        return;
    };
    textures.sync(ctx, result);

    egui::TopBottomPanel::bottom("results_panel")
        .resizable(true)
        .default_height(MAX_IMAGE_WIDTH + 60.0)
        .show(ctx, |ui| {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    ui.spacing_mut().item_spacing.x = 32.0;
                    render_image(
                        ui,
                        "Sentinel-2 Image",
                        &result.source_image,
                        textures.source(),
                        None,
                    );
                    render_image(
                        ui,
                        "Deforestation Prediction",
                        &result.mask_image,
                        textures.mask(),
                        Some(Stroke::new(2.0, colors::theme::MASK_BORDER)),
                    );
                });
            });
        });
}

fn render_image(
    ui: &mut egui::Ui,
    title: &str,
    source: &ImageSource,
    texture: Option<&DecodedTexture>,
    border: Option<Stroke>,
) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).size(18.0).strong());
        match texture {
            Some(Ok(texture)) => {
                let response = ui.add(
                    egui::Image::new(texture)
                        .max_width(MAX_IMAGE_WIDTH)
                        .sense(egui::Sense::click()),
                );
                if let Some(stroke) = border {
                    ui.painter().rect_stroke(
                        response.rect,
                        8.0,
                        stroke,
                        egui::StrokeKind::Outside,
                    );
                }
                response.context_menu(|ui| {
                    if ui.button("Copy data URI").clicked() {
                        ui.ctx().copy_text(source.data_uri().to_string());
                        ui.close();
                    }
                });
            }
            Some(Err(reason)) => {
                ui.label(
                    RichText::new(format!("Could not display image: {}", reason))
                        .color(colors::ui::ERROR),
                );
            }
            None => {}
        }
    });
}
