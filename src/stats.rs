use time::{Date, Duration};

use crate::day::format_day_key;
use crate::domain::event::Event;

/// Events attributed to one calendar day, in stored order.
pub fn entries_for_day<'a>(entries: &'a [Event], day_key: &str) -> Vec<&'a Event> {
    entries
        .iter()
        .filter(|event| event.day_key == day_key)
        .collect()
}

pub fn daily_total(entries: &[Event], day_key: &str) -> i64 {
    entries_for_day(entries, day_key)
        .iter()
        .map(|event| event.hydration_contribution)
        .sum()
}

/// The 7 calendar days ending at `ending` inclusive, oldest first.
pub fn weekly_window(ending: Date) -> [Date; 7] {
    std::array::from_fn(|index| ending - Duration::days(6 - index as i64))
}

/// Per-day hydration totals for a 7-day window. Days without events stay
/// at zero; events outside the window are ignored but not touched.
pub fn weekly_totals(entries: &[Event], window: &[Date; 7]) -> [i64; 7] {
    let keys: Vec<String> = window.iter().map(|day| format_day_key(*day)).collect();
    let mut totals = [0i64; 7];
    for event in entries {
        if let Some(index) = keys.iter().position(|key| *key == event.day_key) {
            totals[index] += event.hydration_contribution;
        }
    }
    totals
}
