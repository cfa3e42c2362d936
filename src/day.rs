use std::error::Error;
use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset, Weekday};

/// Day keys are date-only, `YYYY-MM-DD`, so they sort and compare as
/// plain strings.
const DAY_KEY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Source of "now". Injectable so tests can simulate a different day
/// without waiting real time.
pub trait Clock {
    /// The current instant, carrying the offset day boundaries are
    /// computed in.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local time zone. Falls back to UTC when the local
/// offset cannot be determined (sandboxed environments).
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
pub struct FixedClock(pub OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Calendar-day key of an instant, in the instant's own offset.
pub fn day_key_for(instant: OffsetDateTime) -> String {
    format_day_key(instant.date())
}

/// Calendar-day key of an instant, shifted into the clock's offset
/// first. Used when re-deriving day attribution for stored timestamps.
pub fn local_day_key(instant: OffsetDateTime, offset: UtcOffset) -> String {
    day_key_for(instant.to_offset(offset))
}

pub fn today(clock: &dyn Clock) -> String {
    day_key_for(clock.now())
}

pub fn format_day_key(date: Date) -> String {
    date.format(DAY_KEY_FORMAT)
        .expect("day key formatting should never fail")
}

pub fn parse_day_key(raw: &str) -> Result<Date, ParseDayKeyError> {
    Date::parse(raw.trim(), DAY_KEY_FORMAT).map_err(|_| ParseDayKeyError {
        value: raw.to_string(),
    })
}

/// RFC3339 rendering of an instant, offset preserved.
pub fn rfc3339(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .expect("RFC3339 formatting should never fail")
}

pub fn parse_rfc3339(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()
}

pub fn weekday_label(date: Date) -> &'static str {
    match date.weekday() {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayKeyError {
    value: String,
}

impl fmt::Display for ParseDayKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid day '{}': expected YYYY-MM-DD",
            self.value
        )
    }
}

impl Error for ParseDayKeyError {}
