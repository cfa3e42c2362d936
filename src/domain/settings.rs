use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Time;

pub const DEFAULT_GOAL: i64 = 2000;
pub const DEFAULT_WAKE_TIME: &str = "08:00";
pub const DEFAULT_SLEEP_TIME: &str = "22:00";

const REMINDER_TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

/// User preferences. A singleton document, updated in place and always
/// written back whole. Deserialization tolerates older documents: the
/// pre-rename `notifications` key and absent reminder-window fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_goal")]
    pub goal: i64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(alias = "notifications", default = "default_notifications_enabled")]
    pub notifications_enabled: bool,
    /// Reminder window bounds, `HH:MM` local time.
    #[serde(default = "default_wake_time")]
    pub wake_time: String,
    #[serde(default = "default_sleep_time")]
    pub sleep_time: String,
}

fn default_goal() -> i64 {
    DEFAULT_GOAL
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_wake_time() -> String {
    DEFAULT_WAKE_TIME.to_string()
}

fn default_sleep_time() -> String {
    DEFAULT_SLEEP_TIME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL,
            theme: Theme::Light,
            notifications_enabled: true,
            wake_time: DEFAULT_WAKE_TIME.to_string(),
            sleep_time: DEFAULT_SLEEP_TIME.to_string(),
        }
    }
}

/// Partial settings update; only the populated fields change.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub goal: Option<i64>,
    pub theme: Option<Theme>,
    pub notifications_enabled: Option<bool>,
    pub wake_time: Option<String>,
    pub sleep_time: Option<String>,
}

impl SettingsPatch {
    pub fn has_changes(&self) -> bool {
        self.goal.is_some()
            || self.theme.is_some()
            || self.notifications_enabled.is_some()
            || self.wake_time.is_some()
            || self.sleep_time.is_some()
    }
}

/// Validate a reminder-window bound (`HH:MM`, 24-hour).
pub fn parse_reminder_time(raw: &str) -> Result<Time, ParseReminderTimeError> {
    Time::parse(raw.trim(), REMINDER_TIME_FORMAT).map_err(|_| ParseReminderTimeError {
        value: raw.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReminderTimeError {
    value: String,
}

impl fmt::Display for ParseReminderTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid reminder time '{}': expected HH:MM (24-hour)",
            self.value
        )
    }
}

impl Error for ParseReminderTimeError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ParseThemeError {
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for Theme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Theme::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError {
    value: String,
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid theme '{}': expected one of {}",
            self.value,
            Theme::ALL
                .iter()
                .map(|theme| theme.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseThemeError {}
