use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use learnstreak_core::calendar::{self, Week};
use learnstreak_core::{Config, Database, DayStatus, GoalEngine};
use serde::Serialize;

use super::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show the seven days of a week with their log status
    Week {
        /// Any day in the week (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Weeks to move forward (negative for back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },
    /// Show a month grid
    Month {
        /// Month to show (YYYY-MM), default the current one
        #[arg(long)]
        month: Option<String>,
    },
    /// List the months around the current one, as configured
    Months,
}

#[derive(Serialize)]
struct DayCell {
    date: String,
    in_month: bool,
    status: Option<DayStatus>,
}

#[derive(Serialize)]
struct MonthView {
    month: String,
    weekdays: [&'static str; 7],
    weeks: Vec<Vec<DayCell>>,
}

fn cells(engine: &GoalEngine<Database>, week: &Week, month: Option<NaiveDate>) -> Vec<DayCell> {
    week.iter()
        .map(|date| {
            let key = calendar::key_for_date(*date);
            DayCell {
                in_month: month.map_or(true, |m| calendar::start_of_month(*date) == m),
                status: engine.status_for(&key),
                date: key,
            }
        })
        .collect()
}

fn parse_month(raw: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|e| format!("invalid month {raw:?} (expected YYYY-MM): {e}").into())
}

pub fn run(action: CalendarAction, now: DateTime<Utc>) -> CliResult {
    let config = Config::load_or_default();
    let first_weekday = config.calendar.first_weekday;
    let engine = open_engine(now)?;
    let today = calendar::local_date(now, engine.time_zone());

    match action {
        CalendarAction::Week { date, offset } => {
            let reference = calendar::shift_week(date.unwrap_or(today), offset);
            let week = calendar::week_span(reference, first_weekday);
            print_json(&cells(&engine, &week, None))
        }
        CalendarAction::Month { month } => {
            let start = match month {
                Some(raw) => parse_month(&raw)?,
                None => calendar::start_of_month(today),
            };
            let view = MonthView {
                month: start.format("%Y-%m").to_string(),
                weekdays: calendar::weekday_symbols_short(first_weekday),
                weeks: calendar::month_grid(start, first_weekday)
                    .iter()
                    .map(|week| cells(&engine, week, Some(start)))
                    .collect(),
            };
            print_json(&view)
        }
        CalendarAction::Months => {
            let months: Vec<String> = calendar::months_around(
                today,
                config.calendar.months_before,
                config.calendar.months_after,
            )
            .iter()
            .map(|m| m.format("%Y-%m").to_string())
            .collect();
            print_json(&months)
        }
    }
}
