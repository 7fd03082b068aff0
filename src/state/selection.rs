//! Spatial and temporal selection driving an analysis request.

use chrono::NaiveDate;

/// Format used for calendar dates on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The single user-chosen geographic point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialSelection {
    pub latitude: f64,
    pub longitude: f64,
}

/// Inclusive start/end calendar bounds for the imagery query.
///
/// No ordering between `start` and `end` is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for DateRange {
    /// One-year window covering 2023.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
        }
    }
}

impl DateRange {
    /// Returns true when `start` does not come after `end`.
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Start bound as `YYYY-MM-DD`.
    pub fn start_string(&self) -> String {
        format_date(self.start)
    }

    /// End bound as `YYYY-MM-DD`.
    pub fn end_string(&self) -> String {
        format_date(self.end)
    }
}

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Selection State Holder: current point and date bounds.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    point: Option<SpatialSelection>,
    range: DateRange,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current point. Coordinates are not range checked.
    pub fn set_point(&mut self, latitude: f64, longitude: f64) {
        self.point = Some(SpatialSelection {
            latitude,
            longitude,
        });
    }

    pub fn set_range_start(&mut self, date: NaiveDate) {
        self.range.start = date;
    }

    pub fn set_range_end(&mut self, date: NaiveDate) {
        self.range.end = date;
    }

    pub fn selection(&self) -> Option<SpatialSelection> {
        self.point
    }

    pub fn range(&self) -> DateRange {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let selection = SelectionState::new();
        assert!(selection.selection().is_none());
        assert_eq!(selection.range().start_string(), "2023-01-01");
        assert_eq!(selection.range().end_string(), "2023-12-31");
    }

    #[test]
    fn test_set_point_replaces_previous() {
        let mut selection = SelectionState::new();
        selection.set_point(9.7489, -83.7534);
        selection.set_point(-3.1, 60.2);

        assert_eq!(
            selection.selection(),
            Some(SpatialSelection {
                latitude: -3.1,
                longitude: 60.2
            })
        );
    }

    #[test]
    fn test_set_point_accepts_out_of_range() {
        let mut selection = SelectionState::new();
        selection.set_point(123.0, 400.0);
        let point = selection.selection().unwrap();
        assert_eq!(point.latitude, 123.0);
        assert_eq!(point.longitude, 400.0);
    }

    #[test]
    fn test_range_fields_are_independent() {
        let mut selection = SelectionState::new();
        selection.set_range_start(date(2024, 3, 5));
        assert_eq!(selection.range().end, date(2023, 12, 31));

        selection.set_range_end(date(2022, 1, 1));
        assert_eq!(selection.range().start, date(2024, 3, 5));
        assert!(!selection.range().is_ordered());
    }
}
