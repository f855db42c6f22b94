//! Grouping, percentage, and streak primitives shared by the analyzers.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Key used when a record is missing the grouping field.
pub const UNKNOWN_GROUP: &str = "unknown";

/// Partition `items` by a string key, preserving first-seen group order
/// and insertion order within each group. Records without a key land in
/// the `"unknown"` group.
pub fn group_by<'a, T, F>(items: &'a [T], key: F) -> Vec<(String, Vec<&'a T>)>
where
    F: Fn(&T) -> Option<String>,
{
    let mut groups: Vec<(String, Vec<&'a T>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let k = match key(item) {
            Some(k) if !k.is_empty() => k,
            _ => UNKNOWN_GROUP.to_string(),
        };
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Format `part / whole` as a one-decimal percentage string.
///
/// A zero (or negative) denominator short-circuits to `"0.0"` so empty
/// categories never produce NaN or Infinity.
pub fn percentage(part: f64, whole: f64) -> String {
    if whole <= 0.0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part / whole * 100.0)
}

/// Count records per calendar day, ordered by day.
pub fn daily_counts<I>(days: I) -> BTreeMap<NaiveDate, usize>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut counts = BTreeMap::new();
    for day in days {
        *counts.entry(day).or_insert(0) += 1;
    }
    counts
}

/// Consecutive-day streak stats over a set of record days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Consecutive days ending today or yesterday; 0 otherwise
    pub current: u32,
    /// Longest run of consecutive days ever
    pub longest: u32,
}

/// Compute streaks from record days.
///
/// Days are deduplicated and sorted first. `longest` comes from a forward
/// scan where only a delta of exactly one day extends the run; `current`
/// walks backward from the most recent day and is non-zero only when that
/// day is `today` or yesterday.
pub fn calculate_streaks<I>(days: I, today: NaiveDate) -> Streaks
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: Vec<NaiveDate> = days.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if days.is_empty() {
        return Streaks::default();
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
    }
    longest = longest.max(run);

    let last = *days.last().expect("non-empty");
    let mut current = 0u32;
    if last == today || last == today - Duration::days(1) {
        current = 1;
        let mut i = days.len() - 1;
        while i > 0 && days[i] - days[i - 1] == Duration::days(1) {
            current += 1;
            i -= 1;
        }
    }

    Streaks { current, longest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_group_by_preserves_order_and_unknown() {
        let items = vec![
            ("running", 1),
            ("", 2),
            ("cycling", 3),
            ("running", 4),
        ];
        let groups = group_by(&items, |(k, _)| {
            if k.is_empty() {
                None
            } else {
                Some(k.to_string())
            }
        });

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, "running");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, UNKNOWN_GROUP);
        assert_eq!(groups[2].0, "cycling");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1.0, 3.0), "33.3");
        assert_eq!(percentage(2.0, 2.0), "100.0");
        assert_eq!(percentage(5.0, 0.0), "0.0");
    }

    #[test]
    fn test_percentages_sum_to_roughly_100() {
        let counts = [3.0, 5.0, 7.0, 11.0];
        let total: f64 = counts.iter().sum();
        let sum: f64 = counts
            .iter()
            .map(|c| percentage(*c, total).parse::<f64>().unwrap())
            .sum();
        assert!((sum - 100.0).abs() <= 0.1 * counts.len() as f64);
    }

    #[test]
    fn test_streaks_consecutive_run() {
        let days = vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)];
        let streaks = calculate_streaks(days, d(2024, 1, 3));
        assert_eq!(streaks, Streaks { current: 3, longest: 3 });
    }

    #[test]
    fn test_streaks_gap_resets() {
        let days = vec![d(2024, 1, 1), d(2024, 1, 5)];
        // Today far after both: no current streak, singleton runs only
        let streaks = calculate_streaks(days.clone(), d(2024, 1, 10));
        assert_eq!(streaks, Streaks { current: 0, longest: 1 });

        // Today on the last record day: current restarts at 1
        let streaks = calculate_streaks(days.clone(), d(2024, 1, 5));
        assert_eq!(streaks, Streaks { current: 1, longest: 1 });

        // Yesterday also counts
        let streaks = calculate_streaks(days, d(2024, 1, 6));
        assert_eq!(streaks.current, 1);
    }

    #[test]
    fn test_streaks_old_long_run() {
        // A long run that ended a week ago still sets longest but not current
        let days = vec![
            d(2024, 1, 1),
            d(2024, 1, 2),
            d(2024, 1, 3),
            d(2024, 1, 4),
        ];
        let streaks = calculate_streaks(days, d(2024, 1, 12));
        assert_eq!(streaks, Streaks { current: 0, longest: 4 });
    }

    #[test]
    fn test_streaks_duplicate_days_collapse() {
        let days = vec![d(2024, 2, 1), d(2024, 2, 1), d(2024, 2, 2)];
        let streaks = calculate_streaks(days, d(2024, 2, 2));
        assert_eq!(streaks, Streaks { current: 2, longest: 2 });
    }

    #[test]
    fn test_streaks_empty() {
        let streaks = calculate_streaks(std::iter::empty(), d(2024, 1, 1));
        assert_eq!(streaks, Streaks::default());
    }

    #[test]
    fn test_daily_counts() {
        let counts = daily_counts(vec![d(2024, 3, 5), d(2024, 3, 5), d(2024, 3, 6)]);
        assert_eq!(counts[&d(2024, 3, 5)], 2);
        assert_eq!(counts[&d(2024, 3, 6)], 1);
    }
}
