use crate::error::{GheatError, Result};
use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
};

/// Shift `date` back by `months` calendar months, keeping the day of month.
///
/// When that day does not exist in the target month the surplus days roll
/// forward into the following month: Mar 31 minus one month is Mar 2 in a
/// leap year and Mar 3 otherwise. Clamping to the last day is not applied.
pub fn sub_months_rolling(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) - i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day0())))
}

/// Most recent Sunday at or before `date`.
pub fn most_recent_sunday(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday();
    date - Days::new(u64::from(back))
}

/// Interpret a wall-clock time in `tz`.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times
/// skipped by a forward jump are read with the offset in effect before the
/// jump, so 02:30 in a 02:00 to 03:00 gap becomes 03:30 on the same date.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = *local - TimeDelta::days(1);
            let offset = tz
                .offset_from_local_datetime(&before)
                .earliest()
                .map(|offset| offset.fix())
                .unwrap_or_else(|| tz.offset_from_utc_datetime(local).fix());
            let utc = *local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// `date` moved back by `months` calendar months, as an error when out of range.
pub fn date_months_before(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    sub_months_rolling(date, months).ok_or_else(|| {
        GheatError::InvalidDate(format!("{months} months before {date} is out of range"))
    })
}

/// `now` moved back by `months` calendar months at the same wall-clock time.
pub fn months_before<Tz: TimeZone>(now: &DateTime<Tz>, months: u32) -> Result<DateTime<Tz>> {
    let local = now.naive_local();
    let date = date_months_before(local.date(), months)?;
    Ok(resolve_local(&now.timezone(), &date.and_time(local.time())))
}
