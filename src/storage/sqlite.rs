/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::{DomainError, Habit, HabitId, HabitStatus, StreakRecord};
use crate::engine::ExecutionUpdate;
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, description, frequency, tracking_period, status, \
                             start_date, end_date, current_streak, execution_percentage, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::configure(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (tests and dry runs)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, StorageError> {
        // Cascading deletes of executions and history depend on this
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Load execution dates for a habit
    fn load_executions(&self, habit_id: &HabitId) -> Result<BTreeSet<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT executed_on FROM habit_executions WHERE habit_id = ?1 ORDER BY executed_on",
        )?;
        let dates = stmt.query_map(params![habit_id.to_string()], |row| row.get::<_, NaiveDate>(0))?;

        let mut executions = BTreeSet::new();
        for date in dates {
            executions.insert(date?);
        }
        Ok(executions)
    }

    /// Load closed streak runs for a habit, oldest first
    fn load_history(&self, habit_id: &HabitId) -> Result<Vec<StreakRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT period_start, period_end, length, frequency
             FROM streak_history WHERE habit_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![habit_id.to_string()], |row| {
            Ok((
                row.get::<_, NaiveDate>(0)?,
                row.get::<_, NaiveDate>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut history = Vec::new();
        for row in rows {
            let (period_start, period_end, length, frequency) = row?;
            history.push(StreakRecord::new(
                period_start,
                period_end,
                length,
                parse_column("streak_history.frequency", &frequency)?,
            ));
        }
        Ok(history)
    }

    /// Fill in executions and streak history of a freshly loaded habit
    fn load_children(&self, mut habit: Habit) -> Result<Habit, StorageError> {
        habit.executions = self.load_executions(&habit.id)?;
        habit.streak_history = self.load_history(&habit.id)?;
        Ok(habit)
    }
}

/// Raw column values of a `habits` row
struct HabitRow {
    id: String,
    name: String,
    description: Option<String>,
    frequency: String,
    tracking_period: String,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    current_streak: u32,
    execution_percentage: u8,
    created_at: DateTime<Utc>,
}

impl HabitRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            frequency: row.get(3)?,
            tracking_period: row.get(4)?,
            status: row.get(5)?,
            start_date: row.get(6)?,
            end_date: row.get(7)?,
            current_streak: row.get(8)?,
            execution_percentage: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn into_habit(self) -> Result<Habit, StorageError> {
        let id = HabitId::from_string(&self.id).map_err(|_| StorageError::Corrupt {
            column: "habits.id".to_string(),
            value: self.id.clone(),
        })?;

        Ok(Habit::from_existing(
            id,
            self.name,
            self.description,
            parse_column("habits.frequency", &self.frequency)?,
            parse_column("habits.tracking_period", &self.tracking_period)?,
            parse_column("habits.status", &self.status)?,
            self.start_date,
            self.end_date,
            self.current_streak,
            self.execution_percentage,
            self.created_at,
        ))
    }
}

/// Parse a stored enum code, logging values this build does not understand
fn parse_column<T>(column: &str, value: &str) -> Result<T, StorageError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(|e: DomainError| {
        tracing::error!("Unreadable value '{}' in {}: {}", value, column, e);
        StorageError::Corrupt {
            column: column.to_string(),
            value: value.to_string(),
        }
    })
}

impl HabitStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO habits ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                HABIT_COLUMNS
            ),
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.frequency.code(),
                habit.tracking_period.code(),
                habit.status.code(),
                habit.start_date,
                habit.end_date,
                habit.current_streak,
                habit.execution_percentage,
                habit.created_at,
            ],
        )?;

        for date in &habit.executions {
            tx.execute(
                "INSERT INTO habit_executions (habit_id, executed_on) VALUES (?1, ?2)",
                params![habit.id.to_string(), date],
            )?;
        }

        tx.commit()?;
        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
            params![habit_id.to_string()],
            HabitRow::read,
        );

        match result {
            Ok(row) => self.load_children(row.into_habit()?),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Update name, description and status
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?2, description = ?3, status = ?4 WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.status.code(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Delete a habit; executions and history go with it
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![habit_id.to_string()])?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    /// List habits with optional status filtering
    fn list_habits(&self, status: Option<HabitStatus>) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits", HABIT_COLUMNS);
        if status.is_some() {
            sql.push_str(" WHERE status = ?1");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match status {
            Some(status) => stmt
                .query_map(params![status.code()], HabitRow::read)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], HabitRow::read)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut habits = Vec::with_capacity(rows.len());
        for row in rows {
            habits.push(self.load_children(row.into_habit()?)?);
        }

        Ok(habits)
    }

    /// Record an execution with its statistics in one transaction
    fn record_execution(
        &self,
        habit_id: &HabitId,
        update: &ExecutionUpdate,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let rows_affected = tx.execute(
            "UPDATE habits SET current_streak = ?2, execution_percentage = ?3 WHERE id = ?1",
            params![
                habit_id.to_string(),
                update.current_streak,
                update.execution_percentage,
            ],
        )?;
        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO habit_executions (habit_id, executed_on) VALUES (?1, ?2)",
            params![habit_id.to_string(), update.executed_on],
        )?;
        if inserted == 0 {
            return Err(StorageError::DuplicateExecution {
                habit_id: habit_id.to_string(),
                date: update.executed_on.to_string(),
            });
        }

        if let Some(record) = &update.closed_run {
            tx.execute(
                "INSERT INTO streak_history (
                    habit_id, period_start, period_end, length, frequency, recorded_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    habit_id.to_string(),
                    record.period_start,
                    record.period_end,
                    record.length,
                    record.frequency.code(),
                    Utc::now(),
                ],
            )?;
        }

        tx.commit()?;
        tracing::debug!("Recorded execution for habit {} on {}", habit_id, update.executed_on);
        Ok(())
    }

    /// Replace details, schedule, statistics, executions and history of a habit
    fn save_schedule(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let id = habit.id.to_string();

        let rows_affected = tx.execute(
            "UPDATE habits SET
                frequency = ?2,
                tracking_period = ?3,
                start_date = ?4,
                end_date = ?5,
                current_streak = ?6,
                execution_percentage = ?7,
                name = ?8,
                description = ?9
             WHERE id = ?1",
            params![
                id,
                habit.frequency.code(),
                habit.tracking_period.code(),
                habit.start_date,
                habit.end_date,
                habit.current_streak,
                habit.execution_percentage,
                habit.name,
                habit.description,
            ],
        )?;
        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id: id });
        }

        tx.execute("DELETE FROM habit_executions WHERE habit_id = ?1", params![id])?;
        for date in &habit.executions {
            tx.execute(
                "INSERT INTO habit_executions (habit_id, executed_on) VALUES (?1, ?2)",
                params![id, date],
            )?;
        }

        // History is append-only, so it can only have been emptied
        if habit.streak_history.is_empty() {
            tx.execute("DELETE FROM streak_history WHERE habit_id = ?1", params![id])?;
        }

        tx.commit()?;
        tracing::debug!("Saved schedule of habit {}", habit.id);
        Ok(())
    }

    fn save_percentage(&self, habit_id: &HabitId, percentage: u8) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET execution_percentage = ?2 WHERE id = ?1",
            params![habit_id.to_string(), percentage],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }
        Ok(())
    }
}
