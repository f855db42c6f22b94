//! Goals analyzer
//!
//! Merges the fitness-module and general goal buckets into one view. A
//! fitness goal's stored category is the activity kind it tracks, so the
//! merge rewrites it to `"fitness"`; general goals with no category fall
//! back to `"general"`.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::primitives::{group_by, percentage};
use super::report::Report;
use crate::types::{GoalRecord, GoalStatus};

/// Overall completion summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRates {
    /// One-decimal percentage string
    pub overall: String,
    pub completed: usize,
    pub active: usize,
    pub total: usize,
}

/// Per-category status counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Deadline-oriented view of the merged goals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAnalysis {
    pub total_with_dates: usize,
    pub overdue: usize,
    /// Active goals due within the next 7 days
    pub upcoming_this_week: usize,
}

/// Goals domain summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
    pub completion_rates: CompletionRates,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub time_analysis: TimeAnalysis,
}

/// Merge the two goal buckets, normalizing categories.
pub fn merge_goal_buckets(
    fitness_goals: &[GoalRecord],
    general_goals: &[GoalRecord],
) -> Vec<GoalRecord> {
    let mut merged = Vec::with_capacity(fitness_goals.len() + general_goals.len());
    for goal in fitness_goals {
        let mut goal = goal.clone();
        goal.category = "fitness".to_string();
        merged.push(goal);
    }
    for goal in general_goals {
        let mut goal = goal.clone();
        if goal.category.is_empty() {
            goal.category = "general".to_string();
        }
        merged.push(goal);
    }
    merged
}

/// Analyze both goal buckets. Empty merged list yields the sentinel.
pub fn analyze_goals(
    fitness_goals: &[GoalRecord],
    general_goals: &[GoalRecord],
    today: NaiveDate,
) -> Report<GoalsSummary> {
    let all = merge_goal_buckets(fitness_goals, general_goals);
    if all.is_empty() {
        return Report::empty();
    }

    let total = all.len();
    let active = all.iter().filter(|g| g.status == GoalStatus::Active).count();
    let completed = all
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    let overdue = all.iter().filter(|g| g.is_overdue(today)).count();

    let category_breakdown = group_by(&all, |g| Some(g.category.clone()))
        .into_iter()
        .map(|(category, members)| CategoryBreakdown {
            category,
            total: members.len(),
            active: members
                .iter()
                .filter(|g| g.status == GoalStatus::Active)
                .count(),
            completed: members
                .iter()
                .filter(|g| g.status == GoalStatus::Completed)
                .count(),
        })
        .collect();

    let with_dates: Vec<&GoalRecord> = all.iter().filter(|g| g.target_date.is_some()).collect();
    let week_from_now = today + Duration::days(7);
    let upcoming_this_week = with_dates
        .iter()
        .filter(|g| {
            g.status == GoalStatus::Active
                && g.target_date
                    .map(|t| t >= today && t <= week_from_now)
                    .unwrap_or(false)
        })
        .count();

    Report::data(GoalsSummary {
        total,
        active,
        completed,
        overdue,
        completion_rates: CompletionRates {
            overall: percentage(completed as f64, total as f64),
            completed,
            active,
            total,
        },
        category_breakdown,
        time_analysis: TimeAnalysis {
            total_with_dates: with_dates.len(),
            overdue: with_dates.iter().filter(|g| g.is_overdue(today)).count(),
            upcoming_this_week,
        },
    })
}
