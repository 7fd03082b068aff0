//! UI modules for the Deforestation Workbench application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, selected location, and request status
//! - Left panel: Date range and submit button
//! - Central canvas: Basemap tiles with click-to-select
//! - Bottom panel: Source image and prediction mask
//! - Alert dialog: Validation and request failures

mod alert_dialog;
mod basemap;
mod canvas;
pub mod colors;
mod controls_panel;
mod results_panel;
mod textures;
mod top_bar;

pub use alert_dialog::{render_alert_dialog, render_blocking_message};
pub use basemap::Basemap;
pub use canvas::render_canvas;
pub use controls_panel::render_controls_panel;
pub use results_panel::render_results_panel;
pub use textures::ResultTextureCache;
pub use top_bar::render_top_bar;
