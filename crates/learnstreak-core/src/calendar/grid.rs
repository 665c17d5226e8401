//! Week spans and month grids.
//!
//! Everything here works on plain `NaiveDate`s: a grid cell is a calendar day,
//! not an instant, so converting to the user's zone happens once (see
//! [`super::local_date`]) before calling in.
//!
//! A month grid is always week-aligned:
//!
//! ```text
//!  Sun Mon Tue Wed Thu Fri Sat
//!  [30] [31]  1   2   3   4   5     <- leading days borrowed from the previous month
//!   6   7   8   9  10  11  12
//!  ...
//!  27  28  29  30  31 [1] [2]       <- trailing days borrowed from the next month
//! ```

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

const SHORT_WEEKDAY_SYMBOLS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One row of a month grid.
pub type Week = [NaiveDate; 7];

/// Column of `day` in a week that starts on `first_weekday` (0..=6).
pub fn weekday_column(day: Weekday, first_weekday: Weekday) -> u32 {
    (day.num_days_from_sunday() + 7 - first_weekday.num_days_from_sunday()) % 7
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = start_of_month(date);
    match start.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(start).num_days() as u32,
        // Only reachable in the final month chrono can represent (a December).
        None => 31,
    }
}

/// The seven consecutive days of the week containing `reference`.
pub fn week_span(reference: NaiveDate, first_weekday: Weekday) -> Week {
    let back = weekday_column(reference.weekday(), first_weekday);
    let start = reference
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(reference);
    consecutive_days(start)
}

/// Week-aligned grid for the month containing `month_start`.
///
/// Every row has exactly seven dates and the concatenated rows form a gap-free
/// run of consecutive days covering the whole month.
pub fn month_grid(month_start: NaiveDate, first_weekday: Weekday) -> Vec<Week> {
    let start = start_of_month(month_start);
    let leading = weekday_column(start.weekday(), first_weekday);
    let rows = (leading + days_in_month(start)).div_ceil(7);

    let grid_start = start
        .checked_sub_days(Days::new(u64::from(leading)))
        .unwrap_or(start);

    let mut days = grid_start.iter_days();
    (0..rows)
        .map(|_| std::array::from_fn(|_| days.next().unwrap_or(NaiveDate::MAX)))
        .collect()
}

/// `reference` moved by whole weeks (negative goes back).
pub fn shift_week(reference: NaiveDate, weeks: i64) -> NaiveDate {
    let days = Days::new(weeks.unsigned_abs().saturating_mul(7));
    let shifted = if weeks >= 0 {
        reference.checked_add_days(days)
    } else {
        reference.checked_sub_days(days)
    };
    shifted.unwrap_or(reference)
}

/// Month starts from `before` months before `center` to `after` months after it.
pub fn months_around(center: NaiveDate, before: u32, after: u32) -> Vec<NaiveDate> {
    let center = start_of_month(center);
    let earlier = (1..=before)
        .rev()
        .filter_map(|delta| center.checked_sub_months(Months::new(delta)));
    let later = (1..=after).filter_map(|delta| center.checked_add_months(Months::new(delta)));
    earlier
        .chain(std::iter::once(center))
        .chain(later)
        .collect()
}

/// Short weekday labels, rotated so `first_weekday` is the first column.
pub fn weekday_symbols_short(first_weekday: Weekday) -> [&'static str; 7] {
    let offset = first_weekday.num_days_from_sunday() as usize;
    std::array::from_fn(|i| SHORT_WEEKDAY_SYMBOLS[(offset + i) % 7])
}

fn consecutive_days(start: NaiveDate) -> Week {
    let mut days = start.iter_days();
    std::array::from_fn(|_| days.next().unwrap_or(NaiveDate::MAX))
}
