//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: one table per record bucket
    r#"
    CREATE TABLE IF NOT EXISTS activities (
        id          TEXT PRIMARY KEY,
        kind        TEXT NOT NULL,
        amount      REAL NOT NULL,
        date        DATETIME NOT NULL,
        notes       TEXT
    );

    CREATE TABLE IF NOT EXISTS goals (
        id             TEXT PRIMARY KEY,
        bucket         TEXT NOT NULL,       -- 'fitness' or 'general'
        name           TEXT NOT NULL,
        category       TEXT NOT NULL DEFAULT '',
        target         REAL NOT NULL,
        current        REAL NOT NULL DEFAULT 0,
        target_date    DATE,
        status         TEXT NOT NULL,       -- 'active' or 'completed'
        created_date   DATE NOT NULL,
        completed_date DATE
    );

    CREATE TABLE IF NOT EXISTS badges (
        id     TEXT PRIMARY KEY,
        name   TEXT NOT NULL,
        earned INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS journal_entries (
        id      TEXT PRIMARY KEY,
        date    DATETIME NOT NULL,
        content TEXT NOT NULL,
        mood    TEXT,
        tags    JSON
    );

    CREATE TABLE IF NOT EXISTS expenses (
        id          TEXT PRIMARY KEY,
        date        DATETIME NOT NULL,
        amount      REAL NOT NULL,
        category    TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS budgets (
        category TEXT PRIMARY KEY,
        amount   REAL NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(date);
    CREATE INDEX IF NOT EXISTS idx_goals_bucket ON goals(bucket, status);
    CREATE INDEX IF NOT EXISTS idx_journal_date ON journal_entries(date);
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables = [
            "activities",
            "goals",
            "badges",
            "journal_entries",
            "expenses",
            "budgets",
        ];

        for table in tables {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }
}
