//! XP history aggregation for the Analysis page.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveDateTime, Utc};
use skillpath_types::XpHistoryEntry;

/// XP earned on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyXp {
    pub date: NaiveDate,
    pub xp: u64,
}

/// Parse the timestamp formats the backends emit: RFC 3339 (local store),
/// HTTP dates (Flask), and naive ISO 8601 (FastAPI), the last taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// One bucket per day for the `days` days ending at `today`, oldest first.
///
/// Entries with a missing or unparseable timestamp are skipped.
#[must_use]
pub fn daily_xp(history: &[XpHistoryEntry], today: NaiveDate, days: u32) -> Vec<DailyXp> {
    let days = days.max(1);
    let first = today - ChronoDuration::days(i64::from(days) - 1);
    let mut buckets: Vec<DailyXp> = (0..days)
        .map(|offset| DailyXp {
            date: first + ChronoDuration::days(i64::from(offset)),
            xp: 0,
        })
        .collect();

    for entry in history {
        let Some(at) = entry.created_at.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let date = at.date_naive();
        if date < first || date > today {
            continue;
        }
        let index = date.signed_duration_since(first).num_days() as usize;
        if let Some(bucket) = buckets.get_mut(index) {
            bucket.xp = bucket.xp.saturating_add(entry.amount);
        }
    }
    buckets
}
