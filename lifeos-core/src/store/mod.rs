//! Record store for lifeos
//!
//! SQLite-backed storage with one table per record bucket and explicit
//! CRUD per bucket. Writes are row-granular; concurrent writers are still
//! last-write-wins, which is accepted for a single-user store.
//!
//! Reads normalize at the boundary: missing fields default, and rows
//! whose date fails to parse are skipped with a warning so invalid dates
//! never reach the analytics arithmetic.

pub mod schema;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::analytics::StoreSnapshot;
use crate::dates::parse_timestamp;
use crate::error::{Error, Result};
use crate::types::{
    ActivityRecord, Badge, BudgetRecord, ExpenseRecord, GoalBucket, GoalRecord, GoalStatus,
    JournalEntry, Mood,
};

const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

fn fmt_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Activities
    // ============================================

    /// Insert an activity and advance matching fitness goals.
    ///
    /// Every active fitness-bucket goal whose category equals the activity
    /// kind gains the activity's amount; goals that reach their target flip
    /// to completed (one-way) with the activity's day stamped. `current` is
    /// not clamped, so overshoot is preserved.
    pub fn log_activity(&self, activity: &ActivityRecord) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO activities (id, kind, amount, date, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                activity.id,
                activity.kind,
                activity.amount,
                fmt_datetime(activity.date),
                activity.notes,
            ],
        )?;

        let advanced = tx.execute(
            "UPDATE goals SET current = current + ?1
             WHERE bucket = 'fitness' AND status = 'active' AND lower(category) = lower(?2)",
            params![activity.amount, activity.kind],
        )?;

        let completed = tx.execute(
            "UPDATE goals SET status = 'completed', completed_date = ?1
             WHERE bucket = 'fitness' AND status = 'active' AND target > 0
               AND current >= target AND lower(category) = lower(?2)",
            params![fmt_date(activity.day()), activity.kind],
        )?;

        tx.commit()?;

        tracing::debug!(
            id = %activity.id,
            kind = %activity.kind,
            goals_advanced = advanced,
            goals_completed = completed,
            "Activity logged"
        );
        Ok(())
    }

    /// All activities, ordered by date. Rows with unparsable dates are skipped.
    pub fn activities(&self) -> Result<Vec<ActivityRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, kind, amount, date, notes FROM activities ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>("id")?,
                row.get::<_, String>("kind")?,
                row.get::<_, f64>("amount")?,
                row.get::<_, String>("date")?,
                row.get::<_, Option<String>>("notes")?,
            ))
        })?;

        let mut activities = Vec::new();
        for row in rows {
            let (id, kind, amount, date, notes) = row?;
            match parse_timestamp(&date) {
                Some(date) => activities.push(ActivityRecord {
                    id,
                    kind,
                    amount,
                    date,
                    notes,
                }),
                None => tracing::warn!(id = %id, date = %date, "Skipping activity with invalid date"),
            }
        }
        Ok(activities)
    }

    /// Delete an activity by id. Returns whether a row was removed.
    pub fn delete_activity(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM activities WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    // ============================================
    // Goals
    // ============================================

    /// Insert a goal into a bucket.
    pub fn insert_goal(&self, bucket: GoalBucket, goal: &GoalRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO goals (id, bucket, name, category, target, current, target_date,
                                status, created_date, completed_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                goal.id,
                bucket.as_str(),
                goal.name,
                goal.category,
                goal.target,
                goal.current,
                goal.target_date.map(fmt_date),
                goal.status.as_str(),
                fmt_date(goal.created_date),
                goal.completed_date.map(fmt_date),
            ],
        )?;
        Ok(())
    }

    fn row_to_goal(row: &Row) -> rusqlite::Result<GoalRecord> {
        let status_str: String = row.get("status")?;
        let target_date: Option<String> = row.get("target_date")?;
        let created_date: String = row.get("created_date")?;
        let completed_date: Option<String> = row.get("completed_date")?;

        Ok(GoalRecord {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get::<_, Option<String>>("category")?.unwrap_or_default(),
            target: row.get("target")?,
            current: row.get::<_, Option<f64>>("current")?.unwrap_or(0.0),
            target_date: target_date.as_deref().and_then(parse_date),
            status: status_str.parse().unwrap_or(GoalStatus::Active),
            created_date: parse_date(&created_date)
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch")),
            completed_date: completed_date.as_deref().and_then(parse_date),
        })
    }

    /// All goals in a bucket, oldest first.
    pub fn goals(&self, bucket: GoalBucket) -> Result<Vec<GoalRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, category, target, current, target_date, status,
                    created_date, completed_date
             FROM goals WHERE bucket = ?1 ORDER BY created_date",
        )?;
        let goals = stmt
            .query_map([bucket.as_str()], Self::row_to_goal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    /// Mark a goal completed. One-way: already-completed goals are
    /// untouched, and asking again is an error rather than a silent no-op.
    pub fn complete_goal(&self, id: &str, completed_on: NaiveDate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE goals SET status = 'completed', completed_date = ?1
             WHERE id = ?2 AND status = 'active'",
            params![fmt_date(completed_on), id],
        )?;
        if n == 0 {
            return Err(Error::RecordNotFound(format!("active goal {}", id)));
        }
        Ok(())
    }

    /// Delete a goal by id.
    pub fn delete_goal(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM goals WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    // ============================================
    // Badges
    // ============================================

    /// Insert or update a badge.
    pub fn upsert_badge(&self, badge: &Badge) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO badges (id, name, earned) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, earned = excluded.earned",
            params![badge.id, badge.name, badge.earned],
        )?;
        Ok(())
    }

    /// All badges.
    pub fn badges(&self) -> Result<Vec<Badge>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, earned FROM badges ORDER BY id")?;
        let badges = stmt
            .query_map([], |row| {
                Ok(Badge {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    earned: row.get("earned")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(badges)
    }

    // ============================================
    // Journal
    // ============================================

    /// Insert a journal entry. Tags are stored as a JSON array.
    pub fn insert_entry(&self, entry: &JournalEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO journal_entries (id, date, content, mood, tags)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id,
                fmt_datetime(entry.date),
                entry.content,
                entry.mood.map(|m| m.as_str()),
                serde_json::to_string(&entry.tags)?,
            ],
        )?;
        Ok(())
    }

    /// All journal entries, ordered by date. Rows with unparsable dates are skipped.
    pub fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, date, content, mood, tags FROM journal_entries ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>("id")?,
                row.get::<_, String>("date")?,
                row.get::<_, String>("content")?,
                row.get::<_, Option<String>>("mood")?,
                row.get::<_, Option<String>>("tags")?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, date, content, mood, tags) = row?;
            match parse_timestamp(&date) {
                Some(date) => entries.push(JournalEntry {
                    id,
                    date,
                    content,
                    mood: mood.as_deref().and_then(Mood::parse_lenient),
                    tags: tags
                        .as_deref()
                        .and_then(|t| serde_json::from_str(t).ok())
                        .unwrap_or_default(),
                }),
                None => tracing::warn!(id = %id, date = %date, "Skipping journal entry with invalid date"),
            }
        }
        Ok(entries)
    }

    /// Delete a journal entry by id.
    pub fn delete_entry(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM journal_entries WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    // ============================================
    // Finance
    // ============================================

    /// Insert an expense.
    pub fn insert_expense(&self, expense: &ExpenseRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO expenses (id, date, amount, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.id,
                fmt_datetime(expense.date),
                expense.amount,
                expense.category,
                expense.description,
            ],
        )?;
        Ok(())
    }

    /// All expenses, ordered by date. Rows with unparsable dates are skipped.
    pub fn expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, date, amount, category, description FROM expenses ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>("id")?,
                row.get::<_, String>("date")?,
                row.get::<_, f64>("amount")?,
                row.get::<_, Option<String>>("category")?,
                row.get::<_, Option<String>>("description")?,
            ))
        })?;

        let mut expenses = Vec::new();
        for row in rows {
            let (id, date, amount, category, description) = row?;
            match parse_timestamp(&date) {
                Some(date) => expenses.push(ExpenseRecord {
                    id,
                    date,
                    amount,
                    category: category.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                }),
                None => tracing::warn!(id = %id, date = %date, "Skipping expense with invalid date"),
            }
        }
        Ok(expenses)
    }

    /// Delete an expense by id.
    pub fn delete_expense(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
        Ok(n > 0)
    }

    /// Set (or replace) the monthly cap for a category.
    pub fn set_budget(&self, budget: &BudgetRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO budgets (category, amount) VALUES (?1, ?2)
             ON CONFLICT(category) DO UPDATE SET amount = excluded.amount",
            params![budget.category, budget.amount],
        )?;
        Ok(())
    }

    /// All budgets.
    pub fn budgets(&self) -> Result<Vec<BudgetRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT category, amount FROM budgets ORDER BY category")?;
        let budgets = stmt
            .query_map([], |row| {
                Ok(BudgetRecord {
                    category: row.get("category")?,
                    amount: row.get("amount")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(budgets)
    }

    // ============================================
    // Snapshot
    // ============================================

    /// Fresh read of every bucket for the analytics layer.
    pub fn read_snapshot(&self) -> Result<StoreSnapshot> {
        Ok(StoreSnapshot {
            activities: self.activities()?,
            fitness_goals: self.goals(GoalBucket::Fitness)?,
            badges: self.badges()?,
            journal_entries: self.journal_entries()?,
            expenses: self.expenses()?,
            budgets: self.budgets()?,
            general_goals: self.goals(GoalBucket::General)?,
        })
    }
}
