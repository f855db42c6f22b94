//! Journal analyzer
//!
//! Word counts, mood distribution, writing-time patterns, streaks, and
//! tag frequencies over the journal bucket.

use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use std::collections::HashMap;

use super::primitives::{calculate_streaks, group_by, percentage, Streaks};
use super::report::Report;
use crate::types::{JournalEntry, ALL_MOODS};

/// One mood level's share of entries that recorded a mood.
#[derive(Debug, Clone, Serialize)]
pub struct MoodSlice {
    pub mood: String,
    pub symbol: String,
    pub count: usize,
    pub percentage: String,
}

/// Mood distribution over entries that recorded a mood.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodAnalysis {
    pub distribution: Vec<MoodSlice>,
    /// Mean mood score (1-5) as a one-decimal string
    pub average_mood: String,
    pub total_with_mood: usize,
}

/// One time-of-day bucket's share of entries.
#[derive(Debug, Clone, Serialize)]
pub struct TimeOfDaySlice {
    pub time: String,
    pub count: usize,
    pub percentage: String,
}

/// When and how much gets written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingPatterns {
    pub average_word_count: usize,
    pub time_of_day_preference: Vec<TimeOfDaySlice>,
}

/// Tag with its usage count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Journal domain summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalSummary {
    pub total_entries: usize,
    pub average_word_count: usize,
    pub mood_analysis: Report<MoodAnalysis>,
    pub writing_patterns: WritingPatterns,
    pub streaks: Streaks,
    pub tags_analysis: Vec<TagCount>,
}

/// Mean mood score over entries, one decimal. Entries without a mood are
/// ignored by the caller; an empty slice yields `"0.0"`.
pub fn average_mood(entries: &[&JournalEntry]) -> String {
    let scored: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.mood.map(|m| m.score()))
        .collect();
    if scored.is_empty() {
        return "0.0".to_string();
    }
    let mean = scored.iter().sum::<f64>() / scored.len() as f64;
    format!("{:.1}", mean)
}

fn time_of_day(hour: u32) -> &'static str {
    match hour {
        0..=5 => "night",
        6..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    }
}

fn analyze_moods(entries: &[JournalEntry]) -> Report<MoodAnalysis> {
    let with_mood: Vec<&JournalEntry> = entries.iter().filter(|e| e.mood.is_some()).collect();
    if with_mood.is_empty() {
        return Report::empty();
    }

    let total = with_mood.len();
    let distribution = ALL_MOODS
        .iter()
        .map(|mood| {
            let count = with_mood.iter().filter(|e| e.mood == Some(*mood)).count();
            MoodSlice {
                mood: mood.as_str().to_string(),
                symbol: mood.symbol().to_string(),
                count,
                percentage: percentage(count as f64, total as f64),
            }
        })
        .filter(|slice| slice.count > 0)
        .collect();

    Report::data(MoodAnalysis {
        distribution,
        average_mood: average_mood(&with_mood),
        total_with_mood: total,
    })
}

fn analyze_writing_patterns(entries: &[JournalEntry]) -> WritingPatterns {
    let total_words: usize = entries.iter().map(|e| e.word_count()).sum();
    let average_word_count = if entries.is_empty() {
        0
    } else {
        (total_words as f64 / entries.len() as f64).round() as usize
    };

    let time_of_day_preference = group_by(entries, |e| {
        Some(time_of_day(e.date.hour()).to_string())
    })
    .into_iter()
    .map(|(time, members)| TimeOfDaySlice {
        time,
        count: members.len(),
        percentage: percentage(members.len() as f64, entries.len() as f64),
    })
    .collect();

    WritingPatterns {
        average_word_count,
        time_of_day_preference,
    }
}

fn analyze_tags(entries: &[JournalEntry], top_n: usize) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        for tag in &entry.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    // Count descending, then tag name for a stable order
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    tags.truncate(top_n);
    tags
}

/// Analyze the journal bucket. Empty input yields the sentinel.
pub fn analyze_journal(
    entries: &[JournalEntry],
    today: NaiveDate,
    top_tags: usize,
) -> Report<JournalSummary> {
    if entries.is_empty() {
        return Report::empty();
    }

    let writing_patterns = analyze_writing_patterns(entries);
    let streaks = calculate_streaks(entries.iter().map(|e| e.day()), today);

    Report::data(JournalSummary {
        total_entries: entries.len(),
        average_word_count: writing_patterns.average_word_count,
        mood_analysis: analyze_moods(entries),
        writing_patterns,
        streaks,
        tags_analysis: analyze_tags(entries, top_tags),
    })
}
