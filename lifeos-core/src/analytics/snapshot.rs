//! Aggregate analytics facade
//!
//! Assembles every per-domain analyzer, the correlation engine, and the
//! timeframe trends into one comprehensive snapshot. The facade is a pure
//! function over a [`StoreSnapshot`] plus an injected "now", so tests are
//! deterministic and storage stays out of the arithmetic. It never fails:
//! empty domains flow through as `hasData: false` sentinels.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::correlation::{
    correlate_fitness_and_mood, correlate_spending_and_mood, productivity_patterns, Correlation,
    ProductivityPatterns, SpendingMoodCorrelation,
};
use super::finance::{analyze_finance, FinanceSummary};
use super::fitness::{analyze_fitness, FitnessSummary};
use super::goals::{analyze_goals, GoalsSummary};
use super::journal::{analyze_journal, average_mood, JournalSummary};
use super::primitives::group_by;
use super::report::Report;
use crate::config::AnalyticsConfig;
use crate::dates::{month_range, week_range, DateRange, Timeframe};
use crate::types::{
    ActivityRecord, Badge, BudgetRecord, ExpenseRecord, GoalRecord, GoalStatus, JournalEntry,
};

/// A fresh read of every record bucket.
///
/// Built by [`crate::store::Database::read_snapshot`]; the analytics layer
/// treats it as an immutable snapshot and has no cache or invalidation
/// contract of its own.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub activities: Vec<ActivityRecord>,
    pub fitness_goals: Vec<GoalRecord>,
    pub badges: Vec<Badge>,
    pub journal_entries: Vec<JournalEntry>,
    pub expenses: Vec<ExpenseRecord>,
    pub budgets: Vec<BudgetRecord>,
    pub general_goals: Vec<GoalRecord>,
}

/// Record counts per domain for one range.
#[derive(Debug, Clone, Serialize)]
pub struct DomainCounts {
    pub fitness: usize,
    pub journal: usize,
    pub expenses: usize,
}

/// High-level overview across all domains.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_activities: usize,
    pub total_journal_entries: usize,
    pub total_expenses: usize,
    pub total_goals: usize,
    pub active_goals: usize,
    pub completed_goals: usize,
    pub weekly_activity: DomainCounts,
    pub monthly_activity: DomainCounts,
}

/// Cross-domain correlation results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlations {
    pub fitness_journal_correlation: Correlation,
    pub productivity_patterns: ProductivityPatterns,
    pub spending_mood_correlation: SpendingMoodCorrelation,
}

/// Count of one activity kind inside a trend range.
#[derive(Debug, Clone, Serialize)]
pub struct KindCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
}

/// Fitness slice of one timeframe.
#[derive(Debug, Clone, Serialize)]
pub struct FitnessTrend {
    pub total: usize,
    pub types: Vec<KindCount>,
}

/// Goals slice of one timeframe.
#[derive(Debug, Clone, Serialize)]
pub struct GoalsTrend {
    pub created: usize,
    pub completed: usize,
}

/// Journal slice of one timeframe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalTrend {
    pub total: usize,
    pub average_mood: String,
}

/// Finance slice of one timeframe.
#[derive(Debug, Clone, Serialize)]
pub struct FinanceTrend {
    /// Total amount spent in the range
    pub total: f64,
    pub count: usize,
}

/// All four domains re-filtered for one timeframe.
#[derive(Debug, Clone, Serialize)]
pub struct TimeframeTrends {
    pub fitness: FitnessTrend,
    pub goals: GoalsTrend,
    pub journal: JournalTrend,
    pub finance: FinanceTrend,
}

/// Trends for every supported timeframe.
#[derive(Debug, Clone, Serialize)]
pub struct Trends {
    pub week: TimeframeTrends,
    pub month: TimeframeTrends,
    #[serde(rename = "3months")]
    pub three_months: TimeframeTrends,
    #[serde(rename = "6months")]
    pub six_months: TimeframeTrends,
}

/// The comprehensive analytics snapshot. Derived, never persisted;
/// rebuilt on every request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
    pub overview: Overview,
    pub fitness: Report<FitnessSummary>,
    pub goals: Report<GoalsSummary>,
    pub journal: Report<JournalSummary>,
    pub finance: Report<FinanceSummary>,
    pub correlations: Correlations,
    pub trends: Trends,
}

fn overview_stats(data: &StoreSnapshot, now: NaiveDateTime) -> Overview {
    let all_goals =
        super::goals::merge_goal_buckets(&data.fitness_goals, &data.general_goals);

    let count_in = |range: &DateRange| DomainCounts {
        fitness: data
            .activities
            .iter()
            .filter(|a| range.contains(a.date))
            .count(),
        journal: data
            .journal_entries
            .iter()
            .filter(|e| range.contains(e.date))
            .count(),
        expenses: data
            .expenses
            .iter()
            .filter(|e| range.contains(e.date))
            .count(),
    };

    let this_week = week_range(now.date());
    let this_month = month_range(now.date());

    Overview {
        total_activities: data.activities.len(),
        total_journal_entries: data.journal_entries.len(),
        total_expenses: data.expenses.len(),
        total_goals: all_goals.len(),
        active_goals: all_goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .count(),
        completed_goals: all_goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count(),
        weekly_activity: count_in(&this_week),
        monthly_activity: count_in(&this_month),
    }
}

/// Re-filter every record store for one timeframe. Each timeframe derives
/// its own range independently; there is no shared pre-filtered cache.
fn timeframe_trends(data: &StoreSnapshot, timeframe: Timeframe, now: NaiveDateTime) -> TimeframeTrends {
    let range = timeframe.range(now);

    let activities: Vec<&ActivityRecord> = data
        .activities
        .iter()
        .filter(|a| range.contains(a.date))
        .collect();
    let types = group_by(&activities, |a| Some(a.kind.clone()))
        .into_iter()
        .map(|(kind, members)| KindCount {
            kind,
            count: members.len(),
        })
        .collect();

    let all_goals =
        super::goals::merge_goal_buckets(&data.fitness_goals, &data.general_goals);
    // Goal dates are calendar days; compare against the range's days so a
    // goal created or completed today counts before the day is over.
    let day_in_range =
        |d: chrono::NaiveDate| d >= range.start.date() && d <= range.end.date();

    let entries: Vec<&JournalEntry> = data
        .journal_entries
        .iter()
        .filter(|e| range.contains(e.date))
        .collect();

    let expenses: Vec<&ExpenseRecord> = data
        .expenses
        .iter()
        .filter(|e| range.contains(e.date))
        .collect();

    TimeframeTrends {
        fitness: FitnessTrend {
            total: activities.len(),
            types,
        },
        goals: GoalsTrend {
            created: all_goals
                .iter()
                .filter(|g| day_in_range(g.created_date))
                .count(),
            completed: all_goals
                .iter()
                .filter(|g| g.completed_date.map(day_in_range).unwrap_or(false))
                .count(),
        },
        journal: JournalTrend {
            total: entries.len(),
            average_mood: average_mood(&entries),
        },
        finance: FinanceTrend {
            total: expenses.iter().map(|e| e.amount).sum(),
            count: expenses.len(),
        },
    }
}

/// Build the comprehensive analytics snapshot.
pub fn comprehensive(
    data: &StoreSnapshot,
    now: NaiveDateTime,
    config: &AnalyticsConfig,
) -> AnalyticsSnapshot {
    let today = now.date();

    AnalyticsSnapshot {
        overview: overview_stats(data, now),
        fitness: analyze_fitness(
            &data.activities,
            &data.fitness_goals,
            &data.badges,
            now,
            config.recent_window_days,
        ),
        goals: analyze_goals(&data.fitness_goals, &data.general_goals, today),
        journal: analyze_journal(&data.journal_entries, today, config.top_tags),
        finance: analyze_finance(&data.expenses, &data.budgets, today),
        correlations: Correlations {
            fitness_journal_correlation: correlate_fitness_and_mood(
                &data.activities,
                &data.journal_entries,
            ),
            productivity_patterns: productivity_patterns(&data.activities, &data.journal_entries),
            spending_mood_correlation: correlate_spending_and_mood(
                &data.expenses,
                &data.journal_entries,
            ),
        },
        trends: Trends {
            week: timeframe_trends(data, Timeframe::Week, now),
            month: timeframe_trends(data, Timeframe::Month, now),
            three_months: timeframe_trends(data, Timeframe::ThreeMonths, now),
            six_months: timeframe_trends(data, Timeframe::SixMonths, now),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mood;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn activity(id: &str, day: u32) -> ActivityRecord {
        ActivityRecord {
            id: id.into(),
            kind: "running".into(),
            amount: 5.0,
            date: dt(2024, 6, day, 7),
            notes: None,
        }
    }

    fn entry(id: &str, day: u32, mood: Option<Mood>) -> JournalEntry {
        JournalEntry {
            id: id.into(),
            date: dt(2024, 6, day, 21),
            content: "a few words here".into(),
            mood,
            tags: vec![],
        }
    }

    #[test]
    fn test_empty_store_yields_sentinels_everywhere() {
        let data = StoreSnapshot::default();
        let snapshot = comprehensive(&data, dt(2024, 6, 15, 12), &AnalyticsConfig::default());

        assert!(!snapshot.fitness.has_data());
        assert!(!snapshot.goals.has_data());
        assert!(!snapshot.journal.has_data());
        assert!(!snapshot.finance.has_data());
        assert!(!snapshot.correlations.fitness_journal_correlation.has_data());
        assert!(!snapshot.correlations.spending_mood_correlation.has_data());
        assert_eq!(snapshot.overview.total_activities, 0);
        assert_eq!(snapshot.trends.week.fitness.total, 0);

        // The whole snapshot still serializes cleanly
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["fitness"], serde_json::json!({ "hasData": false }));
        assert!(json["trends"]["3months"].is_object());
    }

    #[test]
    fn test_overview_week_and_month_counts() {
        // 2024-06-15 is a Saturday; the Sunday-aligned week is 06-09..06-15
        let data = StoreSnapshot {
            activities: vec![activity("a1", 10), activity("a2", 14), activity("a3", 1)],
            journal_entries: vec![entry("j1", 14, None)],
            ..Default::default()
        };
        let snapshot = comprehensive(&data, dt(2024, 6, 15, 12), &AnalyticsConfig::default());

        assert_eq!(snapshot.overview.total_activities, 3);
        assert_eq!(snapshot.overview.weekly_activity.fitness, 2);
        assert_eq!(snapshot.overview.monthly_activity.fitness, 3);
        assert_eq!(snapshot.overview.weekly_activity.journal, 1);
    }

    #[test]
    fn test_trends_filter_independently() {
        let data = StoreSnapshot {
            activities: vec![
                activity("a1", 14),     // inside the week window
                activity("a2", 1),      // inside the month window only
            ],
            ..Default::default()
        };
        let snapshot = comprehensive(&data, dt(2024, 6, 15, 12), &AnalyticsConfig::default());

        assert_eq!(snapshot.trends.week.fitness.total, 1);
        assert_eq!(snapshot.trends.month.fitness.total, 2);
        assert_eq!(snapshot.trends.six_months.fitness.total, 2);
        assert_eq!(snapshot.trends.week.fitness.types[0].kind, "running");
    }

    #[test]
    fn test_goal_dated_today_counts_in_morning_report() {
        let created = GoalRecord {
            id: "g1".into(),
            name: "Read 12 books".into(),
            category: "general".into(),
            target: 12.0,
            current: 0.0,
            target_date: None,
            status: GoalStatus::Active,
            created_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            completed_date: None,
        };
        let completed = GoalRecord {
            id: "g2".into(),
            name: "Run 10k".into(),
            category: "running".into(),
            target: 10.0,
            current: 10.0,
            target_date: None,
            status: GoalStatus::Completed,
            created_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            completed_date: Some(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
        };
        let data = StoreSnapshot {
            general_goals: vec![created],
            fitness_goals: vec![completed],
            ..Default::default()
        };

        // 09:00 on the day both dates fall on
        let snapshot = comprehensive(&data, dt(2024, 6, 15, 9), &AnalyticsConfig::default());

        assert_eq!(snapshot.trends.week.goals.created, 1);
        assert_eq!(snapshot.trends.week.goals.completed, 1);
        assert_eq!(snapshot.trends.month.goals.created, 2);
    }

    #[test]
    fn test_round_trip_fitness_mood_correlation() {
        // 6 shared days; more activities on better-mood days
        let moods = [
            Mood::Awful,
            Mood::Down,
            Mood::Neutral,
            Mood::Good,
            Mood::Great,
            Mood::Great,
        ];
        let mut activities = Vec::new();
        let mut entries = Vec::new();
        for (i, mood) in moods.iter().enumerate() {
            let day = (i + 1) as u32;
            // i+1 activities on day i+1 tracks the mood ordering
            for n in 0..=i {
                activities.push(activity(&format!("a{}-{}", day, n), day));
            }
            entries.push(entry(&format!("j{}", day), day, Some(*mood)));
        }

        let data = StoreSnapshot {
            activities,
            journal_entries: entries,
            ..Default::default()
        };
        let snapshot = comprehensive(&data, dt(2024, 6, 7, 12), &AnalyticsConfig::default());

        let correlation = &snapshot.correlations.fitness_journal_correlation;
        assert!(correlation.has_data());
        assert_eq!(correlation.data_points(), 6);
        // Association is positive by construction
        assert!(correlation.coefficient().unwrap() > 0.0);
    }
}
