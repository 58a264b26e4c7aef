/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version, 0 for a fresh database
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let result = conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get::<_, i32>(0)
    });

    match result {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(StorageError::Query(e)),
    }
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)
            .map_err(|e| StorageError::Migration(format!("v1 failed: {}", e)))?;
    }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the core tables for habits, executions and streak history
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            frequency TEXT NOT NULL,
            tracking_period TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            current_streak INTEGER NOT NULL DEFAULT 0,
            execution_percentage INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // One row per executed period; the unique index below enforces the date part
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit_executions (
            habit_id TEXT NOT NULL,
            executed_on TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS streak_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id TEXT NOT NULL,
            period_start TEXT NOT NULL,
            period_end TEXT NOT NULL,
            length INTEGER NOT NULL,
            frequency TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_executions_unique
         ON habit_executions (habit_id, executed_on)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_streak_history_habit
         ON streak_history (habit_id, id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_status
         ON habits (status)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
