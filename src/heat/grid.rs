use crate::error::{GheatError, Result};
use crate::model::{bucket, CalendarDay, ColorBucket, DayCommitCounts};
use crate::util::{date_months_before, months_before, most_recent_sunday};
use chrono::{DateTime, Datelike, Days, TimeZone, Weekday};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// The span of days the grid covers.
///
/// `since` is `now` moved back by the lookback in calendar months, and the
/// grid starts on the most recent Sunday at or before it.
#[derive(Debug, Clone)]
pub struct Window<Tz: TimeZone> {
    since: DateTime<Tz>,
    months: u32,
    start_day: CalendarDay,
    today: CalendarDay,
}

impl<Tz: TimeZone> Window<Tz> {
    pub fn new(now: DateTime<Tz>, months: i64) -> Result<Self> {
        let months = u32::try_from(months).map_err(|_| {
            GheatError::InvalidArgument(format!(
                "lookback months must be between 0 and {} (got {months})",
                u32::MAX
            ))
        })?;

        let since = months_before(&now, months)?;
        let since_date = date_months_before(now.date_naive(), months)?;
        let start_day = CalendarDay::new(most_recent_sunday(since_date));
        let today = CalendarDay::new(now.date_naive());

        Ok(Self {
            since,
            months,
            start_day,
            today,
        })
    }

    pub fn since(&self) -> &DateTime<Tz> {
        &self.since
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn start_day(&self) -> CalendarDay {
        self.start_day
    }

    pub fn today(&self) -> CalendarDay {
        self.today
    }

    /// Number of week columns, including the week that contains today.
    pub fn weeks(&self) -> usize {
        let days = (self.today.date() - self.start_day.date()).num_days();
        (days / 7) as usize + 1
    }

    /// The day shown in `column` on the `weekday` row, or `None` once it is
    /// past today.
    pub fn day_at(&self, column: usize, weekday: Weekday) -> Option<CalendarDay> {
        let offset = column as u64 * 7 + u64::from(weekday.num_days_from_sunday());
        let date = self.start_day.date().checked_add_days(Days::new(offset))?;
        (date <= self.today.date()).then(|| CalendarDay::new(date))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub weekday: Weekday,
    pub column: usize,
    pub day: CalendarDay,
    pub count: u32,
    pub bucket: ColorBucket,
}

/// Week columns by weekday rows, plus the month label over each column.
#[derive(Debug, Clone)]
pub struct HeatGrid {
    start_day: CalendarDay,
    today: CalendarDay,
    month_labels: Vec<Option<&'static str>>,
    rows: Vec<Vec<Option<GridCell>>>,
}

impl HeatGrid {
    pub fn layout<Tz: TimeZone>(counts: &DayCommitCounts, window: &Window<Tz>) -> Self {
        let weeks = window.weeks();

        let mut month_labels = Vec::with_capacity(weeks);
        let mut last_month = None;
        for column in 0..weeks {
            let label = window.day_at(column, Weekday::Sun).and_then(|day| {
                let month = day.date().month0();
                if last_month == Some(month) {
                    None
                } else {
                    last_month = Some(month);
                    Some(MONTH_ABBREVIATIONS[month as usize])
                }
            });
            month_labels.push(label);
        }

        let rows = WEEKDAYS
            .iter()
            .map(|&weekday| {
                (0..weeks)
                    .map(|column| {
                        window.day_at(column, weekday).map(|day| {
                            let count = counts.count_for(day);
                            GridCell {
                                weekday,
                                column,
                                day,
                                count,
                                bucket: bucket(count),
                            }
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            start_day: window.start_day(),
            today: window.today(),
            month_labels,
            rows,
        }
    }

    pub fn start_day(&self) -> CalendarDay {
        self.start_day
    }

    pub fn today(&self) -> CalendarDay {
        self.today
    }

    pub fn weeks(&self) -> usize {
        self.month_labels.len()
    }

    pub fn month_labels(&self) -> &[Option<&'static str>] {
        &self.month_labels
    }

    /// Seven rows, Sunday first. Cells after today are `None`.
    pub fn rows(&self) -> &[Vec<Option<GridCell>>] {
        &self.rows
    }

    /// Every laid-out day in chronological order.
    pub fn days(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.weeks()).flat_map(move |column| {
            self.rows.iter().filter_map(move |row| row[column])
        })
    }
}

pub fn weekday_abbreviation(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
