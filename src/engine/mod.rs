/// Statistics engine for habit executions
///
/// This module holds the pure calculations behind marking a habit as done:
/// admission of a new execution, streak maintenance, streak history and the
/// completion percentage. Nothing in here performs I/O; callers load a habit,
/// run the engine on it and persist the result.

pub mod admission;
pub mod calendar;
pub mod percentage;
pub mod policy;
pub mod streak;

pub use admission::{check_admission, Admission, RejectionReason};
pub use policy::{PercentagePolicy, ScheduleChangePolicy, StatisticsPolicy};
pub use streak::StreakUpdate;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DomainError, Frequency, Habit, StreakRecord, TrackingPeriod};

/// What changed on a habit after an execution was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionUpdate {
    pub executed_on: NaiveDate,
    pub current_streak: u32,
    pub closed_run: Option<StreakRecord>,
    pub execution_percentage: u8,
}

/// Result of trying to mark a habit as executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    Rejected(RejectionReason),
    Recorded(ExecutionUpdate),
}

/// Requested changes to a habit's schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleChange {
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub tracking_period: Option<TrackingPeriod>,
}

/// What a schedule change did to recorded data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RescheduleOutcome {
    /// Executions were cleared and cached statistics reset
    pub statistics_reset: bool,
    /// Streak history was cleared as well
    pub history_cleared: bool,
}

/// Engine that applies executions and refreshes statistics on a habit snapshot
///
/// The engine holds no per-habit state. Callers marking the same habit from
/// several places must serialize load, mark and persist themselves.
#[derive(Debug, Clone, Default)]
pub struct StatisticsEngine {
    policy: StatisticsPolicy,
}

impl StatisticsEngine {
    /// Create an engine with the default policies
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: StatisticsPolicy) -> Self {
        Self { policy }
    }

    /// Decide whether `date` may be recorded, without touching the habit
    pub fn check_admission(&self, habit: &Habit, date: NaiveDate) -> Admission {
        admission::check_admission(habit, date)
    }

    /// Admit, record and account for a new execution
    ///
    /// On admission the execution is inserted, the streak recomputed (closing
    /// the previous run into history if it broke) and the cached percentage
    /// refreshed over the whole tracking range.
    pub fn mark_execution(
        &self,
        habit: &mut Habit,
        date: NaiveDate,
    ) -> Result<MarkOutcome, DomainError> {
        if let Admission::Rejected(reason) = self.check_admission(habit, date) {
            tracing::debug!("Execution of habit {} on {} rejected: {}", habit.id, date, reason.code());
            return Ok(MarkOutcome::Rejected(reason));
        }

        let previous_streak = habit.current_streak;
        habit.executions.insert(date);

        let update = streak::update_streak(habit.frequency, &habit.executions, previous_streak, date);
        if let Some(ref record) = update.closed_run {
            tracing::info!("Streak of habit {} broke, closing run {}", habit.id, record);
            habit.streak_history.push(record.clone());
        }
        habit.current_streak = update.current_streak;

        let (start, end) = habit.tracking_range();
        habit.execution_percentage =
            percentage::completion_percentage(habit, start, end, self.policy.percentage)?;

        tracing::debug!(
            "Recorded execution of habit {} on {}: streak {}, {}%",
            habit.id,
            date,
            habit.current_streak,
            habit.execution_percentage
        );

        Ok(MarkOutcome::Recorded(ExecutionUpdate {
            executed_on: date,
            current_streak: habit.current_streak,
            closed_run: update.closed_run,
            execution_percentage: habit.execution_percentage,
        }))
    }

    /// Refresh the cached percentage over a caller-supplied window
    pub fn completion_percentage(
        &self,
        habit: &mut Habit,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<u8, DomainError> {
        let pct = percentage::completion_percentage(
            habit,
            window_start,
            window_end,
            self.policy.percentage,
        )?;
        habit.execution_percentage = pct;
        Ok(pct)
    }

    /// Apply a schedule change
    ///
    /// The end date follows any start date or tracking period change. A
    /// frequency or start date that actually changes invalidates executions
    /// and cached statistics according to the schedule change policy.
    pub fn reschedule(
        &self,
        habit: &mut Habit,
        change: ScheduleChange,
    ) -> Result<RescheduleOutcome, DomainError> {
        let frequency = change.frequency.unwrap_or(habit.frequency);
        let start_date = change.start_date.unwrap_or(habit.start_date);
        let tracking_period = change.tracking_period.unwrap_or(habit.tracking_period);
        let end_date = Habit::end_date_for(start_date, tracking_period)?;

        let invalidates = frequency != habit.frequency || start_date != habit.start_date;

        habit.frequency = frequency;
        habit.start_date = start_date;
        habit.tracking_period = tracking_period;
        habit.end_date = end_date;

        let mut outcome = RescheduleOutcome::default();
        if invalidates {
            habit.executions.clear();
            habit.current_streak = 0;
            habit.execution_percentage = 0;
            outcome.statistics_reset = true;

            if self.policy.schedule_change.clears_history() {
                habit.streak_history.clear();
                outcome.history_cleared = true;
            }
            tracing::info!(
                "Schedule of habit {} changed, statistics reset (history cleared: {})",
                habit.id,
                outcome.history_cleared
            );
        }

        Ok(outcome)
    }
}
