//! Calendar utilities: day keys, week spans, month grids.
//!
//! Pure functions, no state. Deterministic given a reference date and a
//! first-day-of-week convention.

pub mod grid;
pub mod keys;

pub use grid::{
    days_in_month, month_grid, months_around, shift_week, start_of_month, week_span,
    weekday_column, weekday_symbols_short, Week,
};
pub use keys::{
    date_key, date_key_in, key_for_date, local_date, next_midnight, parse_date_key,
    DATE_KEY_FORMAT,
};
