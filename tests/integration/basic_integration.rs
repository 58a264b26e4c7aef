/// Basic integration tests
use chrono::NaiveDate;
use habit_streaks::*;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let habit = Habit::new(
            "Run".to_string(),
            None,
            Frequency::Daily,
            TrackingPeriod::Month,
            date(2024, 3, 1),
        )
        .unwrap();
        let habit_id = habit.id.clone();

        {
            let server = HabitStreaksServer::new(db_path.clone(), StatisticsPolicy::default())
                .await
                .expect("Failed to create first server");
            let storage = server.storage();
            storage.create_habit(&habit).unwrap();

            for day in [1, 2, 3, 5] {
                let mut snapshot = storage.get_habit(&habit_id).unwrap();
                match server.engine().mark_execution(&mut snapshot, date(2024, 3, day)).unwrap() {
                    MarkOutcome::Recorded(update) => storage.record_execution(&habit_id, &update).unwrap(),
                    MarkOutcome::Rejected(reason) => panic!("unexpected rejection: {}", reason),
                }
            }
        }

        let server = HabitStreaksServer::new(db_path, StatisticsPolicy::default())
            .await
            .expect("Failed to create second server");
        let loaded = server.storage().get_habit(&habit_id).unwrap();

        assert_eq!(loaded.executions.len(), 4);
        assert_eq!(loaded.current_streak, 1);
        assert_eq!(loaded.execution_percentage, 12);
        assert_eq!(loaded.streak_history.len(), 1);
        assert_eq!(loaded.streak_history[0].length, 3);
        assert_eq!(loaded.streak_history[0].period_start, date(2024, 3, 1));
        assert_eq!(loaded.streak_history[0].period_end, date(2024, 3, 3));
        assert_eq!(loaded.longest_streak(), 3);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

        let storage: &dyn HabitStorage = &storage;
        assert!(storage.list_habits(None).unwrap().is_empty());
    }
}
