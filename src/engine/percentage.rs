/// Completion percentage over a date window
///
/// The share of expected periods in the window that have an execution, with
/// the window clipped to the habit's tracking range.

use chrono::NaiveDate;

use crate::domain::{DomainError, Habit};
use crate::engine::calendar::{period_end, period_start, periods_between};
use crate::engine::policy::PercentagePolicy;

/// Compute the percentage the habit's cache should hold after a refresh
///
/// Returns the cached value unchanged when there are no executions. A window
/// that does not overlap the tracking range is an invalid range.
pub fn completion_percentage(
    habit: &Habit,
    window_start: NaiveDate,
    window_end: NaiveDate,
    policy: PercentagePolicy,
) -> Result<u8, DomainError> {
    if window_end < window_start {
        return Err(DomainError::InvalidRange {
            start: window_start,
            end: window_end,
        });
    }

    let cached = habit.execution_percentage;
    if habit.executions.is_empty() {
        return Ok(cached);
    }

    let start = window_start.max(habit.start_date);
    let end = window_end.min(habit.end_date);
    if end < start {
        tracing::debug!(
            "Window {}..{} is outside the tracking range of habit {}",
            window_start,
            window_end,
            habit.id
        );
        return Err(DomainError::InvalidRange { start, end });
    }

    let expected = periods_between(habit.frequency, start, end)?;
    let completed = habit
        .executions
        .range(period_start(habit.frequency, start)..=period_end(habit.frequency, end))
        .count() as u64;

    let computed = (completed * 100 / u64::from(expected)).min(100) as u8;
    Ok(policy.apply(cached, computed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, TrackingPeriod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_with(frequency: Frequency, executions: &[NaiveDate]) -> Habit {
        let mut habit = Habit::new(
            "Journal".to_string(),
            None,
            frequency,
            TrackingPeriod::Month,
            date(2024, 3, 1),
        )
        .unwrap();
        habit.executions.extend(executions.iter().copied());
        habit
    }

    #[test]
    fn test_no_executions_returns_cached() {
        let mut habit = habit_with(Frequency::Daily, &[]);
        habit.execution_percentage = 42;
        let pct = completion_percentage(
            &habit,
            date(2024, 3, 1),
            date(2024, 3, 10),
            PercentagePolicy::Recompute,
        )
        .unwrap();
        assert_eq!(pct, 42);
    }

    #[test]
    fn test_daily_percentage_is_floored() {
        let habit = habit_with(Frequency::Daily, &[date(2024, 3, 1), date(2024, 3, 2)]);
        let pct = completion_percentage(
            &habit,
            date(2024, 3, 1),
            date(2024, 3, 3),
            PercentagePolicy::Recompute,
        )
        .unwrap();
        assert_eq!(pct, 66);
    }

    #[test]
    fn test_window_is_clipped_to_tracking_range() {
        let habit = habit_with(Frequency::Daily, &[date(2024, 3, 1), date(2024, 3, 2)]);
        // Everything before March 1st is outside the tracking range
        let pct = completion_percentage(
            &habit,
            date(2024, 2, 1),
            date(2024, 3, 2),
            PercentagePolicy::Recompute,
        )
        .unwrap();
        assert_eq!(pct, 100);
    }

    #[test]
    fn test_weekly_percentage_counts_weeks() {
        // Tracking range 2024-03-01 (Fri) .. 2024-04-01 (Mon) touches 6 ISO weeks
        let habit = habit_with(Frequency::Weekly, &[date(2024, 3, 1), date(2024, 3, 5)]);
        let (start, end) = habit.tracking_range();
        let pct = completion_percentage(&habit, start, end, PercentagePolicy::Recompute).unwrap();
        assert_eq!(pct, 33);
    }

    #[test]
    fn test_never_decrease_with_wider_window() {
        let mut habit = habit_with(Frequency::Daily, &[date(2024, 3, 1), date(2024, 3, 2)]);
        let narrow = completion_percentage(
            &habit,
            date(2024, 3, 1),
            date(2024, 3, 2),
            PercentagePolicy::NeverDecrease,
        )
        .unwrap();
        habit.execution_percentage = narrow;
        let wide = completion_percentage(
            &habit,
            date(2024, 3, 1),
            date(2024, 3, 31),
            PercentagePolicy::NeverDecrease,
        )
        .unwrap();
        assert_eq!(narrow, 100);
        assert_eq!(wide, 100);
    }

    #[test]
    fn test_inverted_window_is_an_error() {
        let habit = habit_with(Frequency::Daily, &[date(2024, 3, 1)]);
        let result = completion_percentage(
            &habit,
            date(2024, 3, 5),
            date(2024, 3, 1),
            PercentagePolicy::NeverDecrease,
        );
        assert!(matches!(result, Err(DomainError::InvalidRange { .. })));
    }

    #[test]
    fn test_window_outside_tracking_range_is_an_error() {
        let mut habit = habit_with(Frequency::Daily, &[date(2024, 3, 1)]);
        habit.execution_percentage = 7;
        let result = completion_percentage(
            &habit,
            date(2030, 1, 1),
            date(2030, 1, 31),
            PercentagePolicy::Recompute,
        );
        // Clipped to 2030-01-01..2024-04-01
        assert_eq!(
            result,
            Err(DomainError::InvalidRange {
                start: date(2030, 1, 1),
                end: date(2024, 4, 1),
            })
        );
    }

    #[test]
    fn test_window_outside_tracking_range_without_executions_keeps_cache() {
        let mut habit = habit_with(Frequency::Daily, &[]);
        habit.execution_percentage = 7;
        let pct = completion_percentage(
            &habit,
            date(2030, 1, 1),
            date(2030, 1, 31),
            PercentagePolicy::Recompute,
        )
        .unwrap();
        assert_eq!(pct, 7);
    }
}
