/// Property tests for the statistics engine
use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use habit_streaks::engine::calendar;
use habit_streaks::*;
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 2).unwrap()
}

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![Just(Frequency::Daily), Just(Frequency::Weekly)]
}

fn arb_offsets() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..90, 0..40)
}

fn new_habit(frequency: Frequency) -> Habit {
    Habit::new(
        "Property habit".to_string(),
        None,
        frequency,
        TrackingPeriod::Year,
        start(),
    )
    .unwrap()
}

proptest! {
    // Streak never exceeds the number of executions, closed runs are real runs
    #[test]
    fn prop_streak_bounded_by_executions(frequency in arb_frequency(), offsets in arb_offsets()) {
        let engine = StatisticsEngine::new();
        let mut habit = new_habit(frequency);

        for offset in offsets {
            engine.mark_execution(&mut habit, start() + Duration::days(offset)).unwrap();
            prop_assert!(habit.current_streak as usize <= habit.executions.len());
            prop_assert!(habit.execution_percentage <= 100);
        }

        if !habit.executions.is_empty() {
            prop_assert!(habit.current_streak >= 1);
        }
        for record in &habit.streak_history {
            prop_assert!(record.length >= 2);
            prop_assert!(record.period_start <= record.period_end);
        }
    }

    // A weekly habit never holds two executions in the same ISO week
    #[test]
    fn prop_weekly_executions_unique_per_week(offsets in arb_offsets()) {
        let engine = StatisticsEngine::new();
        let mut habit = new_habit(Frequency::Weekly);

        for offset in offsets {
            engine.mark_execution(&mut habit, start() + Duration::days(offset)).unwrap();
        }

        let weeks: HashSet<_> = habit
            .executions
            .iter()
            .map(|d| (d.iso_week().year(), d.iso_week().week()))
            .collect();
        prop_assert_eq!(weeks.len(), habit.executions.len());
    }

    // Dates before the start date are always rejected
    #[test]
    fn prop_before_start_rejected(frequency in arb_frequency(), days_before in 1i64..400) {
        let engine = StatisticsEngine::new();
        let mut habit = new_habit(frequency);

        let outcome = engine
            .mark_execution(&mut habit, start() - Duration::days(days_before))
            .unwrap();
        prop_assert_eq!(outcome, MarkOutcome::Rejected(RejectionReason::StartDateNotReached));
        prop_assert!(habit.executions.is_empty());
    }

    // Marking the same date twice is rejected the second time
    #[test]
    fn prop_second_mark_rejected(frequency in arb_frequency(), offset in 0i64..300) {
        let engine = StatisticsEngine::new();
        let mut habit = new_habit(frequency);
        let day = start() + Duration::days(offset);

        let first = engine.mark_execution(&mut habit, day).unwrap();
        prop_assert!(matches!(first, MarkOutcome::Recorded(_)));

        let second = engine.mark_execution(&mut habit, day).unwrap();
        prop_assert_eq!(
            second,
            MarkOutcome::Rejected(RejectionReason::already_completed(frequency))
        );
    }

    // With the default policy the cached percentage only grows
    #[test]
    fn prop_percentage_never_decreases(frequency in arb_frequency(), offsets in arb_offsets()) {
        let engine = StatisticsEngine::new();
        let mut habit = new_habit(frequency);
        let mut last = 0;

        for offset in offsets {
            engine.mark_execution(&mut habit, start() + Duration::days(offset)).unwrap();
            prop_assert!(habit.execution_percentage >= last);
            last = habit.execution_percentage;
        }
    }

    // Consecutive periods marked in order build a streak of the same length
    #[test]
    fn prop_consecutive_periods_build_streak(frequency in arb_frequency(), count in 1u32..30) {
        let engine = StatisticsEngine::new();
        let mut habit = new_habit(frequency);

        for i in 0..count {
            let day = calendar::advance(start(), frequency, i);
            engine.mark_execution(&mut habit, day).unwrap();
        }
        prop_assert_eq!(habit.current_streak, count);
        prop_assert!(habit.streak_history.is_empty());
    }

    // A single day always spans exactly one period
    #[test]
    fn prop_single_day_is_one_period(frequency in arb_frequency(), offset in 0i64..2000) {
        let day = start() + Duration::days(offset);
        prop_assert_eq!(calendar::periods_between(frequency, day, day).unwrap(), 1);
    }
}
