//! Application state management.
//!
//! `AppState` binds the selection, the request coordinator and the map
//! provider status together. The egui panels only read from it and forward
//! user events to its `handle_*` methods, so the whole workflow can be
//! driven headlessly.

pub mod alerts;
pub mod map;
mod selection;
pub mod url_state;

pub use alerts::{AlertKind, UserAlert};
pub use map::{MapLoadState, MapViewState};
pub use selection::{DateRange, SelectionState, SpatialSelection};

use crate::analysis::{
    AnalysisResult, RequestCoordinator, RequestOutcome, SettleOutcome, Settlement, SubmitError,
    Transport,
};
use chrono::NaiveDate;

/// What the surface shows for the current state.
#[derive(Debug, PartialEq)]
pub enum SurfaceView<'a> {
    /// Map provider still initializing; only a loading indicator is shown.
    Loading,
    /// Map provider failed; only an error indicator is shown.
    MapError(&'a str),
    Ready {
        marker: Option<SpatialSelection>,
        /// Present once a request has succeeded.
        images: Option<&'a AnalysisResult>,
        pending: bool,
        alert: Option<&'a UserAlert>,
    },
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    /// Selected point and date bounds
    pub selection: SelectionState,

    /// Request lifecycle and latest result
    pub coordinator: RequestCoordinator,

    /// Map provider initialization status
    pub map_load: MapLoadState,

    /// Map canvas center/zoom/pan
    pub map_view: MapViewState,

    /// Alert awaiting acknowledgement
    pub alert: Option<UserAlert>,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            selection: SelectionState::new(),
            coordinator: RequestCoordinator::new(),
            status_message: "Select a location on the map".to_string(),
            ..Default::default()
        }
    }

    pub fn handle_map_click(&mut self, latitude: f64, longitude: f64) {
        log::debug!("Map clicked at ({:.4}, {:.4})", latitude, longitude);
        self.selection.set_point(latitude, longitude);
    }

    pub fn handle_start_date(&mut self, date: NaiveDate) {
        self.selection.set_range_start(date);
    }

    pub fn handle_end_date(&mut self, date: NaiveDate) {
        self.selection.set_range_end(date);
    }

    /// Button activation: submits the current selection.
    pub fn handle_submit(&mut self, transport: &dyn Transport) -> Result<u64, SubmitError> {
        let result = self.coordinator.submit(&self.selection, transport);
        match result {
            Ok(generation) => {
                self.status_message = format!("Fetching image & prediction (#{})...", generation);
            }
            Err(SubmitError::NoLocation) => {
                self.alert = Some(UserAlert::no_location());
            }
        }
        result
    }

    /// Applies a settled request and raises an alert on failure.
    pub fn handle_settlement(&mut self, settlement: Settlement) -> SettleOutcome {
        let generation = settlement.generation;
        let outcome = self.coordinator.settle(settlement);
        if outcome == SettleOutcome::Superseded {
            return outcome;
        }

        match self.coordinator.last_outcome() {
            Some(RequestOutcome::Succeeded) => {
                self.status_message = format!("Analysis #{} complete", generation);
            }
            Some(RequestOutcome::TransportFailed(err)) => {
                self.status_message = format!("Analysis #{} failed", generation);
                self.alert = Some(UserAlert::request_failed(err.detail()));
            }
            Some(RequestOutcome::ValidationFailed) | None => {}
        }

        outcome
    }

    /// Map provider check settled.
    pub fn handle_map_provider(&mut self, outcome: Result<(), String>) {
        self.map_load.resolve(outcome);
        if let Some(reason) = self.map_load.load_error() {
            log::error!("Error loading maps: {}", reason);
        } else if self.map_load.is_loaded() {
            log::info!("Map provider initialized");
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn surface(&self) -> SurfaceView<'_> {
        match &self.map_load {
            MapLoadState::Loading => SurfaceView::Loading,
            MapLoadState::Failed(reason) => SurfaceView::MapError(reason),
            MapLoadState::Loaded => SurfaceView::Ready {
                marker: self.selection.selection(),
                images: self.coordinator.result(),
                pending: self.coordinator.is_pending(),
                alert: self.alert.as_ref(),
            },
        }
    }
}
