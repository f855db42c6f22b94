//! Analytics engine for lifeos
//!
//! Aggregates heterogeneous records from the independent module buckets
//! and derives statistics:
//! - Grouping, percentage, and streak primitives
//! - Per-domain analyzers (fitness, goals, journal, finance)
//! - Cross-domain correlation (Pearson over date-joined daily series)
//! - Timeframe trends and the comprehensive snapshot facade
//!
//! Every analyzer is a pure function over explicitly passed record slices
//! plus an injected "now"; storage reads happen once, up front, in
//! [`crate::store::Database::read_snapshot`]. Analyzers do not fail:
//! missing data flows out as the `hasData: false` sentinel.

pub mod correlation;
pub mod finance;
pub mod fitness;
pub mod goals;
pub mod journal;
pub mod primitives;
pub mod report;
pub mod snapshot;

pub use correlation::{
    correlate, correlate_fitness_and_mood, correlate_spending_and_mood, productivity_patterns,
    Correlation, DailyPoint, SpendingMoodCorrelation, MIN_OVERLAP_DAYS,
};
pub use finance::{analyze_finance, FinanceSummary};
pub use fitness::{analyze_fitness, FitnessSummary};
pub use goals::{analyze_goals, GoalsSummary};
pub use journal::{analyze_journal, JournalSummary};
pub use primitives::{calculate_streaks, group_by, percentage, Streaks};
pub use report::Report;
pub use snapshot::{comprehensive, AnalyticsSnapshot, Overview, StoreSnapshot, Trends};
