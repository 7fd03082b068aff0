//! User-facing notifications raised by the analysis workflow.

use eframe::egui::Color32;

/// Category of a notification, matching where the failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Submission attempted without a selected location.
    Validation,
    /// Network failure, non-2xx status, or malformed body.
    Transport,
}

impl AlertKind {
    /// Dialog title.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation => "No location selected",
            Self::Transport => "Request failed",
        }
    }

    /// Accent color for the dialog title.
    pub fn color(&self) -> Color32 {
        match self {
            Self::Validation => Color32::from_rgb(255, 200, 50),
            Self::Transport => Color32::from_rgb(255, 80, 80),
        }
    }
}

/// A single alert awaiting acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAlert {
    pub kind: AlertKind,
    pub message: String,
}

impl UserAlert {
    pub const NO_LOCATION: &'static str = "Please select a location on the map.";
    pub const REQUEST_FAILED: &'static str = "Failed to fetch and predict image.";

    pub fn no_location() -> Self {
        Self {
            kind: AlertKind::Validation,
            message: Self::NO_LOCATION.to_string(),
        }
    }

    /// Transport failure, with the backend's explanation when it sent one.
    pub fn request_failed(detail: Option<&str>) -> Self {
        let message = match detail {
            Some(detail) => format!("{}\n{}", Self::REQUEST_FAILED, detail),
            None => Self::REQUEST_FAILED.to_string(),
        };
        Self {
            kind: AlertKind::Transport,
            message,
        }
    }
}
