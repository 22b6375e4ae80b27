use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// One commit as handed over by the history source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub author_name: String,
    pub author_timestamp: DateTime<FixedOffset>,
}

impl CommitRecord {
    pub fn new(author_name: impl Into<String>, author_timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            author_name: author_name.into(),
            author_timestamp,
        }
    }
}

/// A calendar date in the viewer's time zone, with no time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The date `instant` falls on when viewed in `local`.
    pub fn of<Tz: TimeZone, L: TimeZone>(instant: &DateTime<Tz>, local: &L) -> Self {
        Self(instant.with_timezone(local).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Commit counts keyed by day. Only days with at least one commit are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayCommitCounts {
    days: BTreeMap<CalendarDay, u32>,
}

impl DayCommitCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more commit on `day`; the first commit of a day yields 1.
    pub fn record(&mut self, day: CalendarDay) {
        *self.days.entry(day).or_insert(0) += 1;
    }

    /// Commits on `day`, 0 when nothing was recorded.
    pub fn count_for(&self, day: CalendarDay) -> u32 {
        self.days.get(&day).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.days.values().map(|&c| u64::from(c)).sum()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Intensity level of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBucket {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl ColorBucket {
    pub fn for_count(count: u32) -> Self {
        match count {
            0 => ColorBucket::None,
            1 => ColorBucket::Low,
            2 => ColorBucket::Medium,
            3 => ColorBucket::High,
            _ => ColorBucket::Max,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            ColorBucket::None => 0,
            ColorBucket::Low => 1,
            ColorBucket::Medium => 2,
            ColorBucket::High => 3,
            ColorBucket::Max => 4,
        }
    }
}

pub fn bucket(count: u32) -> ColorBucket {
    ColorBucket::for_count(count)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDay {
    pub date: CalendarDay,
    pub weekday: String,
    pub commit_count: u32,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub author: Option<String>,
    pub months: u32,
    pub since: DateTime<FixedOffset>,
    pub start_day: CalendarDay,
    pub today: CalendarDay,
    pub weeks: usize,
    pub total_commits: u64,
    pub days: Vec<GridDay>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn counts_default_to_zero() {
        let mut counts = DayCommitCounts::new();
        assert_eq!(counts.count_for(day(2024, 2, 12)), 0);
        assert!(counts.is_empty());

        counts.record(day(2024, 2, 12));
        assert_eq!(counts.count_for(day(2024, 2, 12)), 1);
        counts.record(day(2024, 2, 12));
        assert_eq!(counts.count_for(day(2024, 2, 12)), 2);
        assert_eq!(counts.count_for(day(2024, 2, 13)), 0);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn bucket_thresholds() {
        assert_eq!(bucket(0), ColorBucket::None);
        assert_eq!(bucket(1), ColorBucket::Low);
        assert_eq!(bucket(2), ColorBucket::Medium);
        assert_eq!(bucket(3), ColorBucket::High);
        assert_eq!(bucket(4), ColorBucket::Max);
        assert_eq!(bucket(100), ColorBucket::Max);
        assert_eq!(bucket(u32::MAX), ColorBucket::Max);
    }

    #[test]
    fn buckets_are_monotonic() {
        let levels: Vec<u8> = (0..10).map(|c| bucket(c).level()).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(levels[0], 0);
        assert_eq!(levels[9], 4);
    }

    #[test]
    fn same_local_date_is_same_day() {
        let local = FixedOffset::east_opt(2 * 3600).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        // 22:30 UTC on the 11th is 00:30 on the 12th at +02:00
        let late = utc.with_ymd_and_hms(2024, 2, 11, 22, 30, 0).unwrap();
        let evening = local.with_ymd_and_hms(2024, 2, 12, 21, 0, 0).unwrap();
        assert_eq!(CalendarDay::of(&late, &local), day(2024, 2, 12));
        assert_eq!(CalendarDay::of(&late, &local), CalendarDay::of(&evening, &local));
        assert_eq!(CalendarDay::of(&late, &utc), day(2024, 2, 11));
    }

    #[test]
    fn normalization_is_idempotent() {
        let local = FixedOffset::west_opt(5 * 3600).unwrap();
        let d = day(2024, 3, 10);
        let midnight = local.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let once = CalendarDay::of(&midnight, &local);
        assert_eq!(once, d);

        let again = local
            .from_local_datetime(&once.date().and_hms_opt(0, 0, 0).unwrap())
            .unwrap();
        assert_eq!(CalendarDay::of(&again, &local), once);
    }

    #[test]
    fn day_displays_as_iso_date() {
        assert_eq!(day(2024, 2, 5).to_string(), "2024-02-05");
    }
}
