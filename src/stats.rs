use crate::history::TIMESTAMP_FORMAT;
use crate::models::{HabitEntry, StatsResponse, TrendPoint};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

pub const SLOT_LABELS: [&str; 4] = ["Habit 1", "Habit 2", "Habit 3", "Habit 4"];

pub fn build_stats(history: &[HabitEntry]) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), history)
}

/// All aggregation is computed against an explicit `today` so the
/// dashboard numbers are reproducible in tests.
pub fn build_stats_at(today: NaiveDate, history: &[HabitEntry]) -> StatsResponse {
    StatsResponse {
        total_entries: total_entries(history),
        complete_sessions: complete_sessions(history),
        success_rate: success_rate(history),
        current_streak: current_streak(history, today),
        habit_frequency: habit_frequency(history),
        trend_last_7_days: trend_last_7_days(history, today),
    }
}

pub fn total_entries(history: &[HabitEntry]) -> usize {
    history.len()
}

/// A session counts as complete when every slot holds something other
/// than whitespace.
pub fn complete_sessions(history: &[HabitEntry]) -> usize {
    history
        .iter()
        .filter(|entry| entry.slots().iter().all(|slot| !slot.trim().is_empty()))
        .count()
}

pub fn success_rate(history: &[HabitEntry]) -> u32 {
    let total = total_entries(history);
    if total == 0 {
        return 0;
    }
    let complete = complete_sessions(history);
    (100.0 * complete as f64 / total as f64).round() as u32
}

/// Per-slot usage counts keyed by the fixed display labels. Slots that
/// never appear are left out of the map.
pub fn habit_frequency(history: &[HabitEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in history {
        for (label, slot) in SLOT_LABELS.iter().zip(entry.slots()) {
            if !slot.trim().is_empty() {
                *counts.entry(label.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Consecutive calendar days with at least one entry, walking backwards
/// from `today`. Entries with unparsable timestamps are dropped before
/// deduplication so they can neither extend nor break a streak.
pub fn current_streak(history: &[HabitEntry], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = history.iter().filter_map(entry_date).collect();
    dates.sort_unstable();
    dates.dedup();

    let mut streak = 0;
    let mut anchor = today;
    for date in dates.into_iter().rev() {
        if (anchor - date).num_days().abs() <= 1 {
            streak += 1;
            anchor = date;
        } else {
            break;
        }
    }
    streak
}

/// Entries per day over the 7 calendar days ending `today`, oldest
/// first. Days without entries stay in the series with a zero count.
pub fn trend_last_7_days(history: &[HabitEntry], today: NaiveDate) -> Vec<TrendPoint> {
    let mut buckets: Vec<(NaiveDate, usize)> = (0..7)
        .rev()
        .map(|offset| (today - Duration::days(offset), 0))
        .collect();

    for date in history.iter().filter_map(entry_date) {
        if let Some(bucket) = buckets.iter_mut().find(|(day, _)| *day == date) {
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, count)| TrendPoint {
            date: date.to_string(),
            count,
        })
        .collect()
}

/// Calendar date of an entry. Accepts our own timestamp format plus
/// RFC 3339 and bare dates, which covers history imported from other
/// installs.
fn entry_date(entry: &HabitEntry) -> Option<NaiveDate> {
    let raw = entry.date.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Some(stamp.date());
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
