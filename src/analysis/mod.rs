//! Deforestation analysis requests.
//!
//! This module provides functionality for:
//! - Building the `/fetch-image` request from the current selection
//! - Sending it to the analysis service without blocking the UI
//! - Applying the newest response and decoding its two images

mod coordinator;
mod decode;
mod transport;
mod types;

pub use coordinator::{
    RequestCoordinator, RequestOutcome, RequestStatus, SettleOutcome, SubmitError,
};
pub use decode::{AnalysisResult, ImageSource};
pub use transport::{AnalysisChannel, HttpTransport, Settlement, Transport};

#[cfg(test)]
pub(crate) use coordinator::tests as test_support;
