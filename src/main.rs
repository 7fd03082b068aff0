#![warn(clippy::all)]

//! Deforestation Workbench - A web-based deforestation analysis client.
//!
//! The user picks a point on the map and a date range; the workbench asks the
//! analysis service for a Sentinel-2 image of that area and the model's
//! deforestation mask, and shows both side by side.

mod analysis;
mod config;
mod geo;
mod state;
mod ui;

use analysis::{AnalysisChannel, HttpTransport};
use eframe::egui;
use geo::TileChannel;
use state::{AppState, MapLoadState, MapViewState, SurfaceView};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = crate::config::WorkbenchConfig::load()?;
    log::info!("Analysis endpoint: {}", config.endpoint_url());

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Deforestation Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc, config)?))),
    )?;

    Ok(())
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("app_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to find app_canvas");
            return;
        };

        let config = match crate::config::WorkbenchConfig::load() {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return;
            }
        };
        log::info!("Analysis endpoint: {}", config.endpoint_url());

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc, config)?))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct WorkbenchApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Channel carrying settled analysis requests back to the UI thread
    analysis_channel: AnalysisChannel,

    /// Channel carrying fetched basemap tiles back to the UI thread
    tile_channel: TileChannel,

    /// HTTP transport for `/fetch-image` and basemap tiles
    transport: HttpTransport,

    /// Basemap tiles and the map provider check
    basemap: ui::Basemap,

    /// Uploaded textures for the current result
    result_textures: ui::ResultTextureCache,
}

impl WorkbenchApp {
    /// Creates a new WorkbenchApp instance.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: crate::config::WorkbenchConfig,
    ) -> std::io::Result<Self> {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut state = AppState::new();

        let url_params = state::url_state::parse_from_url();
        if let (Some(lat), Some(lon)) = (url_params.lat, url_params.lon) {
            state.map_view = MapViewState::centered_on(lat, lon);
        }

        let analysis_channel = AnalysisChannel::new();
        let tile_channel = TileChannel::new();
        let transport = HttpTransport::new(
            config.endpoint_url(),
            &analysis_channel,
            &tile_channel,
            cc.egui_ctx.clone(),
        )?;
        log::info!("Transport ready for {}", transport.endpoint());

        let basemap = ui::Basemap::new(config.maps_tile_url, config.maps_api_key);

        Ok(Self {
            state,
            analysis_channel,
            tile_channel,
            transport,
            basemap,
            result_textures: ui::ResultTextureCache::new(),
        })
    }

    /// Starts the map provider check once the loading indicator has been shown.
    fn initialize_map_provider(&mut self, ctx: &egui::Context) {
        if self.state.map_load != MapLoadState::Loading {
            return;
        }

        self.basemap.start(&mut self.state, &self.transport);
        if self.state.map_load != MapLoadState::Loading {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Some(settlement) = self.analysis_channel.try_recv() {
            self.state.handle_settlement(settlement);
        }
        while let Some(settlement) = self.tile_channel.try_recv() {
            self.basemap.handle_settlement(ctx, settlement, &mut self.state);
        }

        let blocking = match self.state.surface() {
            SurfaceView::Loading => Some(("Loading Maps...", ui::colors::ui::LABEL)),
            SurfaceView::MapError(_) => Some(("Error loading maps", ui::colors::ui::ERROR)),
            SurfaceView::Ready { .. } => None,
        };
        if let Some((text, color)) = blocking {
            ui::render_blocking_message(ctx, text, color);
            self.initialize_map_provider(ctx);
            return;
        }

        ui::render_top_bar(ctx, &self.state);
        ui::render_controls_panel(ctx, &mut self.state, &self.transport);
        ui::render_results_panel(ctx, &self.state, &mut self.result_textures);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(ui::colors::theme::BACKGROUND))
            .show(ctx, |ui| {
                ui::render_canvas(ui, &mut self.state, &mut self.basemap, &self.transport);
            });

        ui::render_alert_dialog(ctx, &mut self.state);
    }
}
