//! Working-day calendar for a reporting month
//!
//! Weekends are the only non-working days; public holidays arrive in the
//! attendance sheet itself as `RH`/`H-C` codes.

use chrono::{Datelike, Month, NaiveDate, Weekday};

/// True for Monday through Friday
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of days in `month`, or `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Every weekday of the month in ascending order.
///
/// An invalid month yields an empty calendar.
pub fn working_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(last_day) = days_in_month(year, month) else {
        return Vec::new();
    };
    (1..=last_day)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| is_weekday(*date))
        .collect()
}

/// English month name ("January".."December")
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Month number for a full English month name, ignoring case and
/// surrounding whitespace. Abbreviations do not match.
pub fn month_from_name(text: &str) -> Option<u32> {
    let text = text.trim();
    (1..=12).find(|&m| month_name(m).is_some_and(|name| name.eq_ignore_ascii_case(text)))
}
