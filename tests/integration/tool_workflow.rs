/// End-to-end habit workflow through the tool layer
use habit_streaks::tools::*;
use habit_streaks::*;
use tempfile::tempdir;

fn mark(server: &HabitStreaksServer, habit_id: &str, date: &str) -> MarkHabitResponse {
    mark_habit(
        server.storage(),
        server.engine(),
        MarkHabitParams {
            habit_id: habit_id.to_string(),
            date: Some(date.to_string()),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_full_habit_lifecycle() {
    let dir = tempdir().unwrap();
    let server = HabitStreaksServer::new(dir.path().join("habits.db"), StatisticsPolicy::default())
        .await
        .unwrap();

    let created = create_habit(
        server.storage(),
        CreateHabitParams {
            name: "Read".to_string(),
            description: Some("20 pages".to_string()),
            frequency: "daily".to_string(),
            tracking_period: Some("month".to_string()),
            start_date: Some("2024-03-01".to_string()),
        },
    )
    .unwrap();
    let habit_id = created.habit_id.unwrap();

    // Build a run of three, skip a day, start again
    for day in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        assert!(mark(&server, &habit_id, day).admitted);
    }
    let restart = mark(&server, &habit_id, "2024-03-05");
    assert_eq!(restart.current_streak, 1);
    assert_eq!(
        restart.closed_run.as_deref(),
        Some("2024-03-01 → 2024-03-03 (3 days)")
    );

    let duplicate = mark(&server, &habit_id, "2024-03-05");
    assert!(!duplicate.admitted);
    assert_eq!(duplicate.rejection.as_deref(), Some("already_completed_today"));

    let early = mark(&server, &habit_id, "2024-02-20");
    assert_eq!(early.rejection.as_deref(), Some("start_date_not_reached"));

    let status = get_habit_status(
        server.storage(),
        StatusParams {
            habit_id: Some(habit_id.clone()),
            include_history: Some(true),
        },
    )
    .unwrap();
    let info = &status.habits[0];
    assert_eq!(info.current_streak, 1);
    assert_eq!(info.longest_streak, 3);
    assert_eq!(info.total_executions, 4);
    assert_eq!(info.streak_history.len(), 1);

    let stats = get_habit_statistics(
        server.storage(),
        server.engine(),
        StatisticsParams {
            habit_id: habit_id.clone(),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-03-05".to_string()),
        },
    )
    .unwrap();
    assert_eq!(stats.execution_percentage, 80);

    // Switching to weekly invalidates the daily executions
    let updated = update_habit(
        server.storage(),
        server.engine(),
        UpdateHabitParams {
            habit_id: habit_id.clone(),
            name: None,
            description: None,
            frequency: Some("weekly".to_string()),
            start_date: None,
            tracking_period: None,
        },
    )
    .unwrap();
    assert!(updated.statistics_reset);

    let id = HabitId::from_string(&habit_id).unwrap();
    let habit = server.storage().get_habit(&id).unwrap();
    assert_eq!(habit.frequency, Frequency::Weekly);
    assert!(habit.executions.is_empty());
    assert_eq!(habit.current_streak, 0);
    assert_eq!(habit.execution_percentage, 0);
    assert_eq!(habit.streak_history.len(), 1);

    assert!(mark(&server, &habit_id, "2024-03-06").admitted);
    assert_eq!(
        mark(&server, &habit_id, "2024-03-08").rejection.as_deref(),
        Some("already_completed_this_week")
    );

    finish_habit(
        server.storage(),
        FinishHabitParams {
            habit_id: habit_id.clone(),
        },
    )
    .unwrap();
    assert_eq!(
        mark(&server, &habit_id, "2024-03-12").rejection.as_deref(),
        Some("habit_finished")
    );

    let listed = list_habits(
        server.storage(),
        ListHabitsParams {
            status: Some("finished".to_string()),
            sort_by: None,
        },
    )
    .unwrap();
    assert_eq!(listed.habits.len(), 1);

    delete_habit(server.storage(), DeleteHabitParams { habit_id }).unwrap();
    assert!(matches!(
        server.storage().get_habit(&id),
        Err(StorageError::HabitNotFound { .. })
    ));
}
