//! Calendar date helpers. Dates are plain `NaiveDate`s keyed as `YYYY-MM-DD`
//! so they sort lexicographically and never shift with the local time zone.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

/// Today in the user's local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `month` is 1-based. Returns `None` for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Weekday of the 1st, counted from Sunday = 0.
pub fn first_weekday_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.weekday().num_days_from_sunday())
}

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(usize::try_from(month).ok()?.checked_sub(1)?).copied()
}
