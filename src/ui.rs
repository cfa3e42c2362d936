use std::io::{self, IsTerminal};

use crate::app::{DailyStats, EventView, WeeklyDay};
use crate::day;
use crate::domain::kind::{IntakeKind, MAX_VOLUME_INPUT, MIN_VOLUME_INPUT};
use crate::domain::settings::Settings;

const TODAY_BAR_WIDTH: usize = 24;
const WEEK_BAR_WIDTH: usize = 16;

pub fn print_today(stats: &DailyStats) {
    let palette = Palette::auto();
    println!("{}", palette.heading(&format!("Hydration {}", stats.day)));

    let percent = stats.percentage.round() as i64;
    let summary = format!(
        "{} / {} ml ({}%)",
        stats.total_hydration, stats.goal, percent
    );
    if stats.goal_reached {
        println!("{} {}", palette.good(&summary), palette.good("goal reached!"));
    } else {
        println!("{}", palette.value(&summary));
    }
    println!(
        "{}",
        palette.accent(&progress_bar(
            stats.total_hydration,
            stats.goal,
            TODAY_BAR_WIDTH
        ))
    );

    if stats.events.is_empty() {
        println!("{}", palette.dim("no entries yet"));
        return;
    }

    let mut events: Vec<&EventView> = stats.events.iter().collect();
    events.sort_by_key(|event| day::parse_rfc3339(&event.created_at));
    for event in events {
        println!("{}", format_event_row(event, &palette));
    }
    println!(
        "{}",
        palette.dim(&format!("{} event(s)", stats.events.len()))
    );
}

pub fn print_event_added(event: &EventView) {
    let palette = Palette::auto();
    let contribution = if event.hydration_contribution > 0 {
        format!("+{} ml hydration", event.hydration_contribution)
    } else {
        "no hydration".to_string()
    };
    println!(
        "logged {} {} {} ({}) {}",
        palette.value(&event.label),
        format_amount(event.amount),
        event.unit,
        contribution,
        palette.id(short_id(&event.id))
    );
}

pub fn print_event_removed(event: &EventView) {
    let palette = Palette::auto();
    println!(
        "removed {} {} {} from {}",
        palette.value(&event.label),
        format_amount(event.amount),
        event.unit,
        event.day_key
    );
}

pub fn print_week(days: &[WeeklyDay], goal: i64) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Last 7 days"));
    for day in days {
        println!("{}", format_week_row(day, goal, &palette));
    }
    println!(
        "{}",
        palette.dim(&format!("daily goal {} ml", goal))
    );
}

pub fn print_kinds(kinds: &[IntakeKind]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Intake kinds"));
    for kind in kinds {
        let percent = (kind.factor * 100.0).round() as i64;
        let mut line = format!(
            "  {} {:<10} {:>4}%  {}  default {}",
            palette.id(&format!("{:<10}", kind.id)),
            kind.label,
            percent,
            kind.unit,
            format_amount(kind.default_amount)
        );
        if kind.requires_custom_label {
            line.push(' ');
            line.push_str(&palette.dim("(label required)"));
        }
        println!("{line}");
    }
    println!(
        "{}",
        palette.dim(&format!(
            "typical volume entries fall between {} and {} ml",
            MIN_VOLUME_INPUT, MAX_VOLUME_INPUT
        ))
    );
}

pub fn print_settings(settings: &Settings) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Settings"));
    println!(
        "  goal           {}",
        palette.value(&format!("{} ml", settings.goal))
    );
    println!("  theme          {}", settings.theme);
    println!(
        "  notifications  {}",
        if settings.notifications_enabled {
            "on"
        } else {
            "off"
        }
    );
    println!(
        "  reminders      {} to {}",
        settings.wake_time, settings.sleep_time
    );
}

fn format_event_row(event: &EventView, palette: &Palette) -> String {
    let contribution = if event.hydration_contribution > 0 {
        palette.good(&format!("+{} ml", event.hydration_contribution))
    } else {
        palette.dim("+0 ml")
    };
    format!(
        "  {}  {:<14} {:>6} {:<2}  {:>8}  {}",
        palette.dim(&clock_time(&event.created_at)),
        event.label,
        format_amount(event.amount),
        event.unit,
        contribution,
        palette.id(short_id(&event.id))
    )
}

fn format_week_row(day: &WeeklyDay, goal: i64, palette: &Palette) -> String {
    let marker = if day.is_today { ">" } else { " " };
    let bar = progress_bar(day.total, goal, WEEK_BAR_WIDTH);
    format!(
        "{} {} {} {} {:>6}",
        marker,
        palette.dim(&day.label),
        palette.id(&day.day),
        palette.accent(&bar),
        day.total
    )
}

/// Fill saturates at the goal; the printed percentage elsewhere does
/// not.
fn progress_bar(total: i64, goal: i64, width: usize) -> String {
    let ratio = if goal > 0 {
        (total as f64 / goal as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{:.1}", amount)
    }
}

fn clock_time(created_at: &str) -> String {
    match day::parse_rfc3339(created_at) {
        Some(instant) => format!("{:02}:{:02}", instant.hour(), instant.minute()),
        None => "--:--".to_string(),
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn value(&self, text: &str) -> String {
        self.paint("1", text)
    }

    fn good(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn accent(&self, text: &str) -> String {
        self.paint("36", text)
    }

    fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }
}
