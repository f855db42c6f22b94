//! Fitness analyzer
//!
//! Pure function over the activity, fitness-goal, and badge buckets.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use super::primitives::{calculate_streaks, daily_counts, group_by, percentage, Streaks};
use super::report::Report;
use crate::dates::rolling_range;
use crate::types::{ActivityRecord, Badge, GoalRecord};

/// One activity kind's share of all logged activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindBreakdown {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    /// One-decimal percentage string
    pub percentage: String,
}

/// A goal plus its derived completion rate.
///
/// The rate is not clamped: a goal past its target reports more than 100%.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: GoalRecord,
    pub completion_rate: String,
}

/// Fitness domain summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessSummary {
    pub total_activities: usize,
    /// Activities inside the rolling recent window
    pub recent_activities: usize,
    pub activity_types: Vec<KindBreakdown>,
    pub streaks: Streaks,
    /// Activity count per calendar day (`YYYY-MM-DD` keys)
    pub daily_activity: BTreeMap<String, usize>,
    pub goal_progress: Vec<GoalProgress>,
    pub earned_badges: usize,
    pub total_badges: usize,
}

/// Analyze the fitness buckets. Empty activity list yields the sentinel.
pub fn analyze_fitness(
    activities: &[ActivityRecord],
    goals: &[GoalRecord],
    badges: &[Badge],
    now: NaiveDateTime,
    recent_window_days: i64,
) -> Report<FitnessSummary> {
    if activities.is_empty() {
        return Report::empty();
    }

    let recent_range = rolling_range(now, recent_window_days);
    let recent_activities = activities
        .iter()
        .filter(|a| recent_range.contains(a.date))
        .count();

    let total = activities.len();
    let activity_types = group_by(activities, |a| Some(a.kind.clone()))
        .into_iter()
        .map(|(kind, members)| KindBreakdown {
            kind,
            count: members.len(),
            percentage: percentage(members.len() as f64, total as f64),
        })
        .collect();

    let streaks = calculate_streaks(activities.iter().map(|a| a.day()), now.date());

    let daily_activity = daily_counts(activities.iter().map(|a| a.day()))
        .into_iter()
        .map(|(day, count)| (day.format("%Y-%m-%d").to_string(), count))
        .collect();

    let goal_progress = goals
        .iter()
        .map(|goal| GoalProgress {
            goal: goal.clone(),
            completion_rate: if goal.target > 0.0 {
                percentage(goal.current, goal.target)
            } else {
                "0.0".to_string()
            },
        })
        .collect();

    Report::data(FitnessSummary {
        total_activities: total,
        recent_activities,
        activity_types,
        streaks,
        daily_activity,
        goal_progress,
        earned_badges: badges.iter().filter(|b| b.earned).count(),
        total_badges: badges.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GoalStatus;
    use chrono::NaiveDate;

    fn activity(id: &str, kind: &str, day: (i32, u32, u32)) -> ActivityRecord {
        ActivityRecord {
            id: id.into(),
            kind: kind.into(),
            amount: 1.0,
            date: NaiveDate::from_ymd_opt(day.0, day.1, day.2)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            notes: None,
        }
    }

    fn now(day: (i32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(day.0, day.1, day.2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_activities_yields_sentinel() {
        let report = analyze_fitness(&[], &[], &[], now((2024, 1, 3)), 30);
        assert!(!report.has_data());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "hasData": false }));
    }

    #[test]
    fn test_kind_breakdown_and_streaks() {
        let activities = vec![
            activity("a1", "running", (2024, 1, 1)),
            activity("a2", "running", (2024, 1, 2)),
            activity("a3", "cycling", (2024, 1, 3)),
        ];
        let report = analyze_fitness(&activities, &[], &[], now((2024, 1, 3)), 30);
        let summary = report.summary().unwrap();

        assert_eq!(summary.total_activities, 3);
        assert_eq!(summary.recent_activities, 3);
        assert_eq!(summary.streaks, Streaks { current: 3, longest: 3 });

        assert_eq!(summary.activity_types[0].kind, "running");
        assert_eq!(summary.activity_types[0].count, 2);
        assert_eq!(summary.activity_types[0].percentage, "66.7");
        assert_eq!(summary.activity_types[1].percentage, "33.3");
    }

    #[test]
    fn test_goal_progress_not_clamped() {
        let activities = vec![activity("a1", "running", (2024, 1, 1))];
        let goals = vec![GoalRecord {
            id: "g1".into(),
            name: "Run 10k".into(),
            category: "running".into(),
            target: 10.0,
            current: 12.5,
            target_date: None,
            status: GoalStatus::Completed,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed_date: None,
        }];
        let report = analyze_fitness(&activities, &goals, &[], now((2024, 1, 1)), 30);
        let summary = report.summary().unwrap();
        assert_eq!(summary.goal_progress[0].completion_rate, "125.0");
    }

    #[test]
    fn test_zero_target_goal_short_circuits() {
        let activities = vec![activity("a1", "yoga", (2024, 1, 1))];
        let goals = vec![GoalRecord {
            id: "g1".into(),
            name: "Broken".into(),
            category: "yoga".into(),
            target: 0.0,
            current: 3.0,
            target_date: None,
            status: GoalStatus::Active,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed_date: None,
        }];
        let report = analyze_fitness(&activities, &goals, &[], now((2024, 1, 1)), 30);
        assert_eq!(
            report.summary().unwrap().goal_progress[0].completion_rate,
            "0.0"
        );
    }

    #[test]
    fn test_badges_counted() {
        let activities = vec![activity("a1", "running", (2024, 1, 1))];
        let badges = vec![
            Badge {
                id: "b1".into(),
                name: "First run".into(),
                earned: true,
            },
            Badge {
                id: "b2".into(),
                name: "Marathon".into(),
                earned: false,
            },
        ];
        let report = analyze_fitness(&activities, &[], &badges, now((2024, 1, 1)), 30);
        let summary = report.summary().unwrap();
        assert_eq!(summary.earned_badges, 1);
        assert_eq!(summary.total_badges, 2);
    }
}
