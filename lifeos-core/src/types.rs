//! Core domain types for lifeos
//!
//! These types are the canonical record model shared by every module
//! (fitness, goals, journal, finance). Records are plain data: there is no
//! referential integrity between buckets, and cross-domain relationships
//! are inferred at read time by matching calendar days.
//!
//! Normalization happens at the storage boundary: missing fields are
//! defaulted and unparsable dates cause the record to be skipped, so
//! nothing downstream ever sees an invalid date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Fitness
// ============================================

/// A single logged fitness activity (a run, a workout, ...).
///
/// Activities are independent of goals; goal progress is recomputed when
/// an activity is logged, not stored as a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Unique identifier
    pub id: String,
    /// Activity kind (free-form, e.g. "running")
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount logged (distance, reps, minutes - unit is implied by kind)
    pub amount: f64,
    /// When the activity happened
    pub date: NaiveDateTime,
    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl ActivityRecord {
    /// Create a new activity with a generated id.
    pub fn new(kind: impl Into<String>, amount: f64, date: NaiveDateTime, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            amount,
            date,
            notes,
        }
    }

    /// Calendar day of this activity.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// An achievement badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    /// Whether the badge has been earned
    #[serde(default)]
    pub earned: bool,
}

// ============================================
// Goals
// ============================================

/// Which module a goal belongs to.
///
/// Fitness goals live in the fitness module and have their `category` set
/// to an activity kind so logged activities can advance them; general
/// goals come from the standalone goals module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalBucket {
    Fitness,
    General,
}

impl GoalBucket {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalBucket::Fitness => "fitness",
            GoalBucket::General => "general",
        }
    }
}

impl std::str::FromStr for GoalBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fitness" => Ok(GoalBucket::Fitness),
            "general" => Ok(GoalBucket::General),
            _ => Err(format!("unknown goal bucket: {}", s)),
        }
    }
}

/// Goal lifecycle status. The active -> completed transition is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            _ => Err(format!("unknown goal status: {}", s)),
        }
    }
}

/// A goal with a numeric target and running progress.
///
/// `current` is advanced in place whenever a matching activity is logged.
/// It is never clamped to `target`, so a goal can report more than 100%
/// progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: String,
    pub name: String,
    /// For fitness goals this is the activity kind the goal tracks;
    /// general goals use it as a free-form category label.
    #[serde(default)]
    pub category: String,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

impl GoalRecord {
    /// Create a new active goal with a generated id and zero progress.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        target: f64,
        target_date: Option<NaiveDate>,
        created_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: category.into(),
            target,
            current: 0.0,
            target_date,
            status: GoalStatus::Active,
            created_date,
            completed_date: None,
        }
    }

    /// A goal is overdue when its target date has passed and it is still active.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.target_date {
            Some(target) => target < today && self.status == GoalStatus::Active,
            None => false,
        }
    }
}

// ============================================
// Journal
// ============================================

/// The five mood levels a journal entry can carry, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Awful,
    Down,
    Neutral,
    Good,
    Great,
}

/// All mood levels in score order, for building distributions.
pub const ALL_MOODS: [Mood; 5] = [
    Mood::Awful,
    Mood::Down,
    Mood::Neutral,
    Mood::Good,
    Mood::Great,
];

impl Mood {
    /// Numeric score 1 (worst) to 5 (best), used for averages and correlation.
    pub fn score(&self) -> f64 {
        match self {
            Mood::Awful => 1.0,
            Mood::Down => 2.0,
            Mood::Neutral => 3.0,
            Mood::Good => 4.0,
            Mood::Great => 5.0,
        }
    }

    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Awful => "awful",
            Mood::Down => "down",
            Mood::Neutral => "neutral",
            Mood::Good => "good",
            Mood::Great => "great",
        }
    }

    /// Display symbol, matching the journal module's mood picker.
    pub fn symbol(&self) -> &'static str {
        match self {
            Mood::Awful => "😢",
            Mood::Down => "😕",
            Mood::Neutral => "😐",
            Mood::Good => "😊",
            Mood::Great => "😄",
        }
    }

    /// Lenient parse used at the storage boundary.
    ///
    /// Accepts names and symbols. Empty input means "no mood recorded";
    /// any other unrecognized value normalizes to the midpoint.
    pub fn parse_lenient(s: &str) -> Option<Mood> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let mood = match s {
            "awful" | "😢" => Mood::Awful,
            "down" | "😕" => Mood::Down,
            "neutral" | "😐" => Mood::Neutral,
            "good" | "😊" => Mood::Good,
            "great" | "😄" => Mood::Great,
            _ => Mood::Neutral,
        };
        Some(mood)
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A journal entry. Mood is optional; word count is derived from content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDateTime,
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Create a new entry with a generated id.
    pub fn new(
        date: NaiveDateTime,
        content: impl Into<String>,
        mood: Option<Mood>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            content: content.into(),
            mood,
            tags,
        }
    }

    /// Calendar day of this entry.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Word count of the content, empty tokens dropped.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

// ============================================
// Finance
// ============================================

/// A single expense. Single implicit currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: String,
    pub date: NaiveDateTime,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl ExpenseRecord {
    /// Create a new expense with a generated id.
    pub fn new(
        date: NaiveDateTime,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            amount,
            category: category.into(),
            description: description.into(),
        }
    }

    /// Calendar day of this expense.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// A monthly spending cap for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub category: String,
    /// Monthly cap
    pub amount: f64,
}
