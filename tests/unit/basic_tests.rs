/// Basic unit tests to verify core functionality through the public API
use chrono::NaiveDate;
use habit_streaks::*;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            Some("A test habit".to_string()),
            Frequency::Daily,
            TrackingPeriod::Month,
            date(2024, 1, 31),
        )
        .unwrap();

        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.status, HabitStatus::Active);
        assert_eq!(habit.end_date, date(2024, 2, 29));
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.execution_percentage, 0);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let result = Habit::new(
            "   ".to_string(),
            None,
            Frequency::Weekly,
            TrackingPeriod::Year,
            date(2024, 1, 1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_frequency_code() {
        assert!(matches!(
            "monthly".parse::<Frequency>(),
            Err(DomainError::UnsupportedFrequency(_))
        ));
    }

    #[test]
    fn test_engine_marks_and_rejects() {
        let engine = StatisticsEngine::new();
        let mut habit = Habit::new(
            "Stretch".to_string(),
            None,
            Frequency::Daily,
            TrackingPeriod::Month,
            date(2024, 3, 1),
        )
        .unwrap();

        assert!(matches!(
            engine.mark_execution(&mut habit, date(2024, 2, 28)).unwrap(),
            MarkOutcome::Rejected(RejectionReason::StartDateNotReached)
        ));
        assert!(matches!(
            engine.mark_execution(&mut habit, date(2024, 3, 1)).unwrap(),
            MarkOutcome::Recorded(_)
        ));
        assert!(matches!(
            engine.mark_execution(&mut habit, date(2024, 3, 1)).unwrap(),
            MarkOutcome::Rejected(RejectionReason::AlreadyCompletedToday)
        ));

        habit.finish();
        assert!(matches!(
            engine.mark_execution(&mut habit, date(2024, 3, 2)).unwrap(),
            MarkOutcome::Rejected(RejectionReason::HabitFinished)
        ));
    }

    #[test]
    fn test_history_policy_on_reschedule() {
        let engine = StatisticsEngine::with_policy(StatisticsPolicy {
            percentage: PercentagePolicy::Recompute,
            schedule_change: ScheduleChangePolicy::ClearExecutionsAndHistory,
        });
        let mut habit = Habit::new(
            "Journal".to_string(),
            None,
            Frequency::Daily,
            TrackingPeriod::Month,
            date(2024, 3, 1),
        )
        .unwrap();
        for day in [1, 2, 4] {
            engine.mark_execution(&mut habit, date(2024, 3, day)).unwrap();
        }
        assert_eq!(habit.streak_history.len(), 1);

        let outcome = engine
            .reschedule(
                &mut habit,
                ScheduleChange {
                    frequency: Some(Frequency::Weekly),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(outcome.statistics_reset);
        assert!(outcome.history_cleared);
        assert!(habit.executions.is_empty());
        assert!(habit.streak_history.is_empty());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server =
            HabitStreaksServer::new(temp_file.path().to_path_buf(), StatisticsPolicy::default())
                .await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }
}
