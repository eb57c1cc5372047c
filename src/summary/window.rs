//! Selection of journal entries from the trailing 7-day window.

use chrono::{DateTime, Duration, Utc};

use crate::models::JournalEntry;

pub const WINDOW_DAYS: i64 = 7;

/// Entries dated inside the window ending at `now`, in their original order.
/// Older entries are logged and skipped; undated entries are silently
/// excluded.
pub fn weekly_entries(journal: &[JournalEntry], now: DateTime<Utc>) -> Vec<JournalEntry> {
    let cutoff = now - Duration::days(WINDOW_DAYS);
    journal
        .iter()
        .filter_map(|entry| match entry.date {
            Some(date) if date >= cutoff => Some(entry.clone()),
            Some(date) => {
                tracing::info!(date = %date.format("%Y-%m-%d"), "Skipping old entry");
                None
            }
            None => None,
        })
        .collect()
}
