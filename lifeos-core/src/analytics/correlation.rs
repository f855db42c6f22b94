//! Cross-domain correlation engine
//!
//! Joins two domains on shared calendar days and computes a Pearson
//! coefficient over the joined pairs. Results below the overlap threshold
//! carry the `hasData: false` sentinel instead of a number; a constant
//! series yields a coefficient of 0 rather than dividing by zero.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{ActivityRecord, ExpenseRecord, JournalEntry};

/// Minimum overlapping calendar days required before correlating.
pub const MIN_OVERLAP_DAYS: usize = 5;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One day's scalar for a domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Correlation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Correlation {
    Data {
        #[serde(rename = "hasData")]
        has_data: bool,
        /// Pearson coefficient, always in [-1, 1]
        correlation: f64,
        #[serde(rename = "dataPoints")]
        data_points: usize,
    },
    Insufficient {
        #[serde(rename = "hasData")]
        has_data: bool,
        message: String,
    },
}

impl Correlation {
    fn data(correlation: f64, data_points: usize) -> Self {
        Correlation::Data {
            has_data: true,
            correlation,
            data_points,
        }
    }

    fn insufficient(message: &str) -> Self {
        Correlation::Insufficient {
            has_data: false,
            message: message.to_string(),
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, Correlation::Data { .. })
    }

    /// The coefficient, if enough data existed.
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Correlation::Data { correlation, .. } => Some(*correlation),
            Correlation::Insufficient { .. } => None,
        }
    }

    pub fn data_points(&self) -> usize {
        match self {
            Correlation::Data { data_points, .. } => *data_points,
            Correlation::Insufficient { .. } => 0,
        }
    }
}

/// Pearson coefficient over paired samples. Zero variance in either
/// series returns 0.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    // Guard against float drift pushing slightly past the bounds
    (numerator / denominator).clamp(-1.0, 1.0)
}

/// Correlate two daily series joined on exact calendar-day equality.
///
/// Duplicate days within a series keep the first value. Fewer than
/// [`MIN_OVERLAP_DAYS`] common days yields the insufficient sentinel.
pub fn correlate(a: &[DailyPoint], b: &[DailyPoint]) -> Correlation {
    let mut b_by_day: HashMap<NaiveDate, f64> = HashMap::new();
    for point in b {
        b_by_day.entry(point.date).or_insert(point.value);
    }

    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for point in a {
        if !seen.insert(point.date) {
            continue;
        }
        if let Some(&y) = b_by_day.get(&point.date) {
            xs.push(point.value);
            ys.push(y);
        }
    }

    if xs.len() < MIN_OVERLAP_DAYS {
        return Correlation::insufficient("Insufficient data for correlation analysis");
    }

    Correlation::data(pearson(&xs, &ys), xs.len())
}

/// Activity count per calendar day.
pub fn activity_count_series(activities: &[ActivityRecord]) -> Vec<DailyPoint> {
    let counts = super::primitives::daily_counts(activities.iter().map(|a| a.day()));
    counts
        .into_iter()
        .map(|(date, count)| DailyPoint {
            date,
            value: count as f64,
        })
        .collect()
}

/// First recorded mood score per calendar day.
pub fn mood_series(entries: &[JournalEntry]) -> Vec<DailyPoint> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut points = Vec::new();
    for entry in entries {
        let Some(mood) = entry.mood else { continue };
        if seen.insert(entry.day()) {
            points.push(DailyPoint {
                date: entry.day(),
                value: mood.score(),
            });
        }
    }
    points
}

/// Total spend per calendar day.
pub fn spending_series(expenses: &[ExpenseRecord]) -> Vec<DailyPoint> {
    let mut totals: HashMap<NaiveDate, f64> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.day()).or_insert(0.0) += expense.amount;
    }
    let mut points: Vec<DailyPoint> = totals
        .into_iter()
        .map(|(date, value)| DailyPoint { date, value })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Does exercising track with mood?
pub fn correlate_fitness_and_mood(
    activities: &[ActivityRecord],
    entries: &[JournalEntry],
) -> Correlation {
    correlate(&activity_count_series(activities), &mood_series(entries))
}

/// Average spend for days carrying one mood level.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSpend {
    pub mood: String,
    pub symbol: String,
    /// Two-decimal string
    pub average_spending: String,
    pub count: usize,
}

/// Spending/mood correlation with the per-mood spending table.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SpendingMoodCorrelation {
    Data {
        #[serde(rename = "hasData")]
        has_data: bool,
        correlation: f64,
        #[serde(rename = "dataPoints")]
        data_points: usize,
        #[serde(rename = "averageSpendingByMood")]
        average_spending_by_mood: Vec<MoodSpend>,
    },
    Insufficient {
        #[serde(rename = "hasData")]
        has_data: bool,
        message: String,
    },
}

impl SpendingMoodCorrelation {
    pub fn has_data(&self) -> bool {
        matches!(self, SpendingMoodCorrelation::Data { .. })
    }
}

/// Does spending track with mood?
pub fn correlate_spending_and_mood(
    expenses: &[ExpenseRecord],
    entries: &[JournalEntry],
) -> SpendingMoodCorrelation {
    let spending = spending_series(expenses);
    let moods = mood_series(entries);

    match correlate(&spending, &moods) {
        Correlation::Insufficient { message, .. } => SpendingMoodCorrelation::Insufficient {
            has_data: false,
            message,
        },
        Correlation::Data {
            correlation,
            data_points,
            ..
        } => {
            let mood_by_day: HashMap<NaiveDate, f64> =
                moods.iter().map(|p| (p.date, p.value)).collect();

            // Spend amounts grouped by the mood recorded that day
            let mut by_mood: HashMap<u8, Vec<f64>> = HashMap::new();
            for point in &spending {
                if let Some(&score) = mood_by_day.get(&point.date) {
                    by_mood.entry(score as u8).or_default().push(point.value);
                }
            }

            let average_spending_by_mood = crate::types::ALL_MOODS
                .iter()
                .filter_map(|mood| {
                    let amounts = by_mood.get(&(mood.score() as u8))?;
                    Some(MoodSpend {
                        mood: mood.as_str().to_string(),
                        symbol: mood.symbol().to_string(),
                        average_spending: format!(
                            "{:.2}",
                            amounts.iter().sum::<f64>() / amounts.len() as f64
                        ),
                        count: amounts.len(),
                    })
                })
                .collect();

            SpendingMoodCorrelation::Data {
                has_data: true,
                correlation,
                data_points,
                average_spending_by_mood,
            }
        }
    }
}

/// Day-of-week pattern over days where exercising and journaling both happened.
#[derive(Debug, Clone, Serialize)]
pub struct DayPattern {
    pub day: String,
    pub count: usize,
}

/// Which weekdays tend to have both an activity and a journal entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityPatterns {
    pub total_productive_days: usize,
    pub day_of_week_patterns: Vec<DayPattern>,
    pub most_productive_day: String,
}

/// Find days with both a fitness activity and a journal entry, bucketed by weekday.
pub fn productivity_patterns(
    activities: &[ActivityRecord],
    entries: &[JournalEntry],
) -> ProductivityPatterns {
    let activity_days: BTreeSet<NaiveDate> = activities.iter().map(|a| a.day()).collect();
    let entry_days: BTreeSet<NaiveDate> = entries.iter().map(|e| e.day()).collect();

    let mut weekday_counts = [0usize; 7];
    let mut total = 0;
    for day in activity_days.intersection(&entry_days) {
        weekday_counts[day.weekday().num_days_from_sunday() as usize] += 1;
        total += 1;
    }

    let day_of_week_patterns: Vec<DayPattern> = WEEKDAYS
        .iter()
        .zip(weekday_counts)
        .filter(|(_, count)| *count > 0)
        .map(|(day, count)| DayPattern {
            day: day.to_string(),
            count,
        })
        .collect();

    let most_productive_day = day_of_week_patterns
        .iter()
        .max_by_key(|p| p.count)
        .map(|p| p.day.clone())
        .unwrap_or_else(|| "Monday".to_string());

    ProductivityPatterns {
        total_productive_days: total,
        day_of_week_patterns,
        most_productive_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mood;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn points(values: &[(u32, f64)]) -> Vec<DailyPoint> {
        values
            .iter()
            .map(|(day, value)| DailyPoint {
                date: d(2024, 1, *day),
                value: *value,
            })
            .collect()
    }

    #[test]
    fn test_below_threshold_is_insufficient() {
        let a = points(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)]);
        let b = points(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)]);
        let result = correlate(&a, &b);
        assert!(!result.has_data());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["hasData"], serde_json::json!(false));
        assert!(json["message"].is_string());
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let a = points(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0)]);
        let b = points(&[(1, 2.0), (2, 4.0), (3, 6.0), (4, 8.0), (5, 10.0)]);
        let result = correlate(&a, &b);
        assert_eq!(result.data_points(), 5);
        assert!((result.coefficient().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let a = points(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0)]);
        let b = points(&[(1, 5.0), (2, 4.0), (3, 3.0), (4, 2.0), (5, 1.0)]);
        let result = correlate(&a, &b);
        assert!((result.coefficient().unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_guard() {
        let a = points(&[(1, 3.0), (2, 3.0), (3, 3.0), (4, 3.0), (5, 3.0)]);
        let b = points(&[(1, 1.0), (2, 4.0), (3, 2.0), (4, 5.0), (5, 3.0)]);
        let result = correlate(&a, &b);
        assert_eq!(result.coefficient(), Some(0.0));
    }

    #[test]
    fn test_coefficient_in_bounds() {
        let a = points(&[(1, 2.0), (2, 9.0), (3, 4.0), (4, 7.0), (5, 1.0), (6, 8.0)]);
        let b = points(&[(1, 5.0), (2, 1.0), (3, 8.0), (4, 2.0), (5, 9.0), (6, 3.0)]);
        let c = correlate(&a, &b).coefficient().unwrap();
        assert!((-1.0..=1.0).contains(&c));
    }

    #[test]
    fn test_only_common_days_join() {
        let a = points(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0), (20, 9.0)]);
        let b = points(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0), (21, 9.0)]);
        let result = correlate(&a, &b);
        assert_eq!(result.data_points(), 5);
    }

    #[test]
    fn test_mood_series_takes_first_of_day() {
        let entries = vec![
            JournalEntry {
                id: "j1".into(),
                date: d(2024, 1, 1).and_hms_opt(8, 0, 0).unwrap(),
                content: "morning".into(),
                mood: Some(Mood::Great),
                tags: vec![],
            },
            JournalEntry {
                id: "j2".into(),
                date: d(2024, 1, 1).and_hms_opt(22, 0, 0).unwrap(),
                content: "evening".into(),
                mood: Some(Mood::Awful),
                tags: vec![],
            },
        ];
        let series = mood_series(&entries);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 5.0);
    }

    #[test]
    fn test_productivity_patterns() {
        // 2024-01-01 is a Monday; activities on Mon/Tue/Wed, entries on Mon/Wed
        let activity = |day| ActivityRecord {
            id: format!("a{}", day),
            kind: "running".into(),
            amount: 1.0,
            date: d(2024, 1, day).and_hms_opt(7, 0, 0).unwrap(),
            notes: None,
        };
        let entry = |day| JournalEntry {
            id: format!("j{}", day),
            date: d(2024, 1, day).and_hms_opt(21, 0, 0).unwrap(),
            content: "note".into(),
            mood: None,
            tags: vec![],
        };

        let patterns = productivity_patterns(
            &[activity(1), activity(2), activity(3)],
            &[entry(1), entry(3)],
        );
        assert_eq!(patterns.total_productive_days, 2);
        assert_eq!(patterns.day_of_week_patterns.len(), 2);
        assert_eq!(patterns.day_of_week_patterns[0].day, "Monday");
        assert_eq!(patterns.most_productive_day, "Monday");
    }

    #[test]
    fn test_productivity_empty_defaults_monday() {
        let patterns = productivity_patterns(&[], &[]);
        assert_eq!(patterns.total_productive_days, 0);
        assert_eq!(patterns.most_productive_day, "Monday");
    }
}
