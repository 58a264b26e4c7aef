/// Execution admission check
///
/// Decides whether a habit may be marked as executed on a given date. A
/// rejection is an ordinary answer, not an error.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit};
use crate::engine::calendar;

/// Why an execution was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    HabitFinished,
    StartDateNotReached,
    AlreadyCompletedToday,
    AlreadyCompletedThisWeek,
}

impl RejectionReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::HabitFinished => "habit_finished",
            RejectionReason::StartDateNotReached => "start_date_not_reached",
            RejectionReason::AlreadyCompletedToday => "already_completed_today",
            RejectionReason::AlreadyCompletedThisWeek => "already_completed_this_week",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::HabitFinished => "This habit is finished and no longer accepts executions",
            RejectionReason::StartDateNotReached => "This habit has not started yet on that date",
            RejectionReason::AlreadyCompletedToday => "This habit is already completed for that day",
            RejectionReason::AlreadyCompletedThisWeek => "This habit is already completed for that week",
        }
    }

    /// The "already completed" reason matching a frequency
    pub fn already_completed(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Daily => RejectionReason::AlreadyCompletedToday,
            Frequency::Weekly => RejectionReason::AlreadyCompletedThisWeek,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected(RejectionReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Check whether `date` may be recorded as an execution of `habit`
///
/// Rules are evaluated in order and the first match wins.
pub fn check_admission(habit: &Habit, date: NaiveDate) -> Admission {
    if habit.is_finished() {
        return Admission::Rejected(RejectionReason::HabitFinished);
    }

    if date < habit.start_date {
        return Admission::Rejected(RejectionReason::StartDateNotReached);
    }

    if calendar::has_execution_in_period(habit.frequency, &habit.executions, date) {
        return Admission::Rejected(RejectionReason::already_completed(habit.frequency));
    }

    Admission::Admitted
}
