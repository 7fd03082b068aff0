//! Request Coordinator: validates the selection, issues requests and applies
//! their settlements.
//!
//! Submissions are never queued or debounced. Every call to
//! [`RequestCoordinator::submit`] with a location issues a new request with a
//! fresh generation number. Only the settlement carrying the latest issued
//! generation is applied; earlier ones are discarded, so the newest request
//! wins regardless of the order in which responses arrive.

use super::decode::{decode, AnalysisResult};
use super::transport::{RequestTicket, Settlement, Transport, TransportError};
use super::types::AnalysisRequest;
use crate::state::SelectionState;
use web_time::Instant;

/// Lifecycle of the most recently issued request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Nothing has been issued yet.
    #[default]
    Idle,
    /// The latest issued request has not settled.
    Pending,
    /// The latest issued request has settled (successfully or not).
    Settled,
}

/// Why a submission was refused before contacting the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("no location selected")]
    NoLocation,
}

/// Typed outcome of the last submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Succeeded,
    ValidationFailed,
    TransportFailed(TransportError),
}

/// Whether a settlement changed coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Applied,
    /// A newer request has been issued since this one.
    Superseded,
}

#[derive(Debug, Default)]
pub struct RequestCoordinator {
    status: RequestStatus,
    latest_generation: u64,
    in_flight: usize,
    issued_at: Option<Instant>,
    result: Option<AnalysisResult>,
    last_outcome: Option<RequestOutcome>,
}

impl RequestCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Requests issued but not yet settled, superseded ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// The most recent applied result. Failed requests leave it untouched.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&RequestOutcome> {
        self.last_outcome.as_ref()
    }

    /// Builds a request from the selection and hands it to the transport.
    ///
    /// Returns the generation of the issued request. Without a selected point
    /// nothing is sent and the status is left as it was.
    pub fn submit(
        &mut self,
        selection: &SelectionState,
        transport: &dyn Transport,
    ) -> Result<u64, SubmitError> {
        let Some(point) = selection.selection() else {
            log::warn!("Submission rejected: no location selected");
            self.last_outcome = Some(RequestOutcome::ValidationFailed);
            return Err(SubmitError::NoLocation);
        };

        let range = selection.range();
        if !range.is_ordered() {
            log::warn!(
                "Start date {} is after end date {}; sending as-is",
                range.start,
                range.end
            );
        }

        let request = AnalysisRequest::new(point, range);

        self.latest_generation += 1;
        let generation = self.latest_generation;
        self.in_flight += 1;
        self.status = RequestStatus::Pending;
        self.issued_at = Some(Instant::now());

        log::info!(
            "Submitting request #{} for ({:.4}, {:.4}) from {} to {}",
            generation,
            request.lat,
            request.lng,
            request.start_date,
            request.end_date
        );

        transport.send(RequestTicket {
            generation,
            request,
        });

        Ok(generation)
    }

    /// Applies a settled request if it is the latest one issued.
    pub fn settle(&mut self, settlement: Settlement) -> SettleOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if settlement.generation != self.latest_generation {
            log::info!(
                "Discarding response for request #{} (latest is #{})",
                settlement.generation,
                self.latest_generation
            );
            return SettleOutcome::Superseded;
        }

        if let Some(issued_at) = self.issued_at.take() {
            log::info!(
                "Request #{} settled in {:.1?}",
                settlement.generation,
                issued_at.elapsed()
            );
        }

        self.status = RequestStatus::Settled;
        match settlement.result {
            Ok(response) => {
                self.result = Some(decode(
                    settlement.generation,
                    &response.rgb_image,
                    &response.mask_image,
                ));
                self.last_outcome = Some(RequestOutcome::Succeeded);
            }
            Err(err) => {
                log::error!(
                    "Error fetching analysis for request #{}: {}",
                    settlement.generation,
                    err
                );
                self.last_outcome = Some(RequestOutcome::TransportFailed(err));
            }
        }

        SettleOutcome::Applied
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::types::AnalysisResponse;
    use std::cell::RefCell;

    /// Transport that records tickets instead of sending them.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) sent: RefCell<Vec<RequestTicket>>,
    }

    impl Transport for RecordingTransport {
        fn send(&self, ticket: RequestTicket) {
            self.sent.borrow_mut().push(ticket);
        }
    }

    pub(crate) fn success(generation: u64, rgb: &str, mask: &str) -> Settlement {
        Settlement {
            generation,
            result: Ok(AnalysisResponse {
                rgb_image: rgb.to_string(),
                mask_image: mask.to_string(),
            }),
        }
    }

    pub(crate) fn failure(generation: u64, status: u16) -> Settlement {
        Settlement {
            generation,
            result: Err(TransportError::Status {
                status,
                message: None,
            }),
        }
    }

    fn selected(lat: f64, lng: f64) -> SelectionState {
        let mut selection = SelectionState::new();
        selection.set_point(lat, lng);
        selection
    }

    #[test]
    fn test_submit_without_point_sends_nothing() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();

        let result = coordinator.submit(&SelectionState::new(), &transport);

        assert_eq!(result, Err(SubmitError::NoLocation));
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(coordinator.status(), RequestStatus::Idle);
        assert_eq!(coordinator.in_flight(), 0);
        assert_eq!(
            coordinator.last_outcome(),
            Some(&RequestOutcome::ValidationFailed)
        );
    }

    #[test]
    fn test_submit_issues_request() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();

        let generation = coordinator
            .submit(&selected(9.7489, -83.7534), &transport)
            .unwrap();

        assert_eq!(generation, 1);
        assert!(coordinator.is_pending());
        assert_eq!(coordinator.in_flight(), 1);

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].generation, 1);
        assert_eq!(sent[0].request.lat, 9.7489);
        assert_eq!(sent[0].request.lng, -83.7534);
        assert_eq!(sent[0].request.start_date, "2023-01-01");
        assert_eq!(sent[0].request.end_date, "2023-12-31");
    }

    #[test]
    fn test_success_replaces_result() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();
        let selection = selected(1.0, 2.0);

        let first = coordinator.submit(&selection, &transport).unwrap();
        coordinator.settle(success(first, "YQ==", "Yg=="));
        let second = coordinator.submit(&selection, &transport).unwrap();
        coordinator.settle(success(second, "Yw==", "ZA=="));

        let result = coordinator.result().unwrap();
        assert_eq!(result.generation, second);
        assert_eq!(result.source_image.payload(), "Yw==");
        assert_eq!(result.mask_image.payload(), "ZA==");
        assert_eq!(coordinator.status(), RequestStatus::Settled);
        assert_eq!(coordinator.last_outcome(), Some(&RequestOutcome::Succeeded));
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();
        let selection = selected(1.0, 2.0);

        let first = coordinator.submit(&selection, &transport).unwrap();
        coordinator.settle(success(first, "aGVsbG8=", "d29ybGQ="));
        let before = coordinator.result().cloned();

        let second = coordinator.submit(&selection, &transport).unwrap();
        assert_eq!(coordinator.settle(failure(second, 500)), SettleOutcome::Applied);

        assert_eq!(coordinator.result().cloned(), before);
        assert_eq!(coordinator.status(), RequestStatus::Settled);
        assert!(matches!(
            coordinator.last_outcome(),
            Some(RequestOutcome::TransportFailed(TransportError::Status {
                status: 500,
                ..
            }))
        ));
    }

    #[test]
    fn test_newest_request_wins() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();
        let selection = selected(1.0, 2.0);

        let first = coordinator.submit(&selection, &transport).unwrap();
        let second = coordinator.submit(&selection, &transport).unwrap();
        assert_eq!(coordinator.in_flight(), 2);

        // Second settles before first
        assert_eq!(
            coordinator.settle(success(second, "bmV3", "bmV3")),
            SettleOutcome::Applied
        );
        assert_eq!(
            coordinator.settle(success(first, "b2xk", "b2xk")),
            SettleOutcome::Superseded
        );

        let result = coordinator.result().unwrap();
        assert_eq!(result.generation, second);
        assert_eq!(result.source_image.payload(), "bmV3");
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[test]
    fn test_superseded_settlement_keeps_pending() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();
        let selection = selected(1.0, 2.0);

        let first = coordinator.submit(&selection, &transport).unwrap();
        coordinator.submit(&selection, &transport).unwrap();

        assert_eq!(
            coordinator.settle(failure(first, 500)),
            SettleOutcome::Superseded
        );
        assert!(coordinator.is_pending());
        assert!(coordinator.last_outcome().is_none());
        assert!(coordinator.result().is_none());
    }

    #[test]
    fn test_validation_failure_while_pending() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();

        coordinator.submit(&selected(1.0, 2.0), &transport).unwrap();
        let result = coordinator.submit(&SelectionState::new(), &transport);

        assert_eq!(result, Err(SubmitError::NoLocation));
        assert!(coordinator.is_pending());
        assert_eq!(transport.sent.borrow().len(), 1);
    }

    #[test]
    fn test_reversed_range_is_sent_unchanged() {
        let transport = RecordingTransport::default();
        let mut coordinator = RequestCoordinator::new();
        let mut selection = selected(1.0, 2.0);
        selection.set_range_start(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        selection.set_range_end(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        coordinator.submit(&selection, &transport).unwrap();

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].request.start_date, "2024-05-01");
        assert_eq!(sent[0].request.end_date, "2024-01-01");
    }
}
