/// Streak history records
///
/// When a streak breaks, the run that just ended is closed into a StreakRecord
/// and appended to the habit's history. Records are never edited afterwards.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Frequency;

/// A closed run of consecutive completed periods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    /// First day of the first period in the run
    pub period_start: NaiveDate,
    /// Last day of the last period in the run
    pub period_end: NaiveDate,
    /// Number of periods in the run
    pub length: u32,
    /// Frequency the run was counted in
    pub frequency: Frequency,
}

impl StreakRecord {
    pub fn new(
        period_start: NaiveDate,
        period_end: NaiveDate,
        length: u32,
        frequency: Frequency,
    ) -> Self {
        Self {
            period_start,
            period_end,
            length,
            frequency,
        }
    }
}

impl fmt::Display for StreakRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} ({})",
            self.period_start,
            self.period_end,
            self.frequency.period_label(self.length)
        )
    }
}
