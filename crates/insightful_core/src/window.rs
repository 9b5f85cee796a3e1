//! Query time windows.

use derive_getters::Getters;
use insightful_error::ValidationError;
use serde::{Deserialize, Serialize};

/// Milliseconds in one calendar day.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A closed interval of millisecond epoch instants.
///
/// Both bounds are sent to the analytics API as-is and treated as inclusive.
///
/// # Examples
///
/// ```
/// use insightful_core::TimeWindow;
///
/// let window = TimeWindow::new(1_700_000_000_000, 1_700_086_399_999).unwrap();
/// assert_eq!(window.duration_ms(), 86_399_999);
///
/// assert!(TimeWindow::new(10, 5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct TimeWindow {
    #[getter(copy)]
    start_ms: i64,
    #[getter(copy)]
    end_ms: i64,
}

impl TimeWindow {
    /// Create a window, rejecting `end_ms < start_ms`.
    #[track_caller]
    pub fn new(start_ms: i64, end_ms: i64) -> Result<Self, ValidationError> {
        if end_ms < start_ms {
            return Err(ValidationError::new(format!(
                "time window ends ({}) before it starts ({})",
                end_ms, start_ms
            )));
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Window covering whole days, from the start of `first_day_ms` through
    /// the last millisecond of the day starting at `last_day_ms`.
    #[track_caller]
    pub fn whole_days(first_day_ms: i64, last_day_ms: i64) -> Result<Self, ValidationError> {
        Self::new(first_day_ms, last_day_ms + MILLIS_PER_DAY - 1)
    }

    /// Width of the window in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}
