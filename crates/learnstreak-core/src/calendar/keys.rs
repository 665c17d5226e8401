//! Local-calendar day keys and midnight boundaries.
//!
//! The engine stores instants in UTC but every day-level decision (has today
//! been logged, when does the day roll over) is made in the user's time zone.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Format of the keys used to index logged days.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD` key of the local calendar day containing `at`.
///
/// Two instants on the same local day always produce the same key, which is
/// what de-duplicates day logging.
pub fn date_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.date_naive().format(DATE_KEY_FORMAT).to_string()
}

/// Key of the local day containing the UTC instant `at`, as seen from `tz`.
pub fn date_key_in<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String {
    date_key(&at.with_timezone(tz))
}

/// Key for a plain calendar date (used by grid renderers to look up status).
pub fn key_for_date(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a key back into a date. Returns `None` for malformed keys.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// The local calendar date containing the UTC instant `at`.
pub fn local_date<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// The first local midnight strictly after `now`, as a UTC instant.
///
/// Where a zone skips midnight (DST transitions at 00:00) the earliest valid
/// instant of that day is used instead.
pub fn next_midnight<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let mut day = local_date(now, tz);
    for _ in 0..3 {
        let Some(next) = day.succ_opt() else {
            break;
        };
        if let Some(boundary) = start_of_local_day(next, tz) {
            if boundary > now {
                return boundary;
            }
        }
        day = next;
    }
    now.checked_add_signed(Duration::days(1)).unwrap_or(now)
}

/// Earliest existing local instant on `date`.
fn start_of_local_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    (0..24).find_map(|hour| {
        let naive = date.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}
