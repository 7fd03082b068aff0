//! Wire types for the `/fetch-image` endpoint.

use crate::state::{DateRange, SpatialSelection};
use serde::{Deserialize, Serialize};

/// JSON body posted to the analysis service.
///
/// Built fresh for each submission and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub lat: f64,
    pub lng: f64,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
}

impl AnalysisRequest {
    pub fn new(point: SpatialSelection, range: DateRange) -> Self {
        Self {
            lat: point.latitude,
            lng: point.longitude,
            start_date: range.start_string(),
            end_date: range.end_string(),
        }
    }
}

/// Successful response body: two base64-encoded PNG images.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisResponse {
    /// Sentinel-2 true color image
    pub rgb_image: String,
    /// Binary deforestation mask
    pub mask_image: String,
}

/// Error body the service sends alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
