use std::error::Error;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::day::{self, Clock, ParseDayKeyError, SystemClock};
use crate::domain::event::{Event, Ledger};
use crate::domain::kind::{self, IntakeKind, CATALOG};
use crate::domain::settings::{
    parse_reminder_time, ParseReminderTimeError, ParseThemeError, Settings, SettingsPatch,
    DEFAULT_GOAL,
};
use crate::domain::unit::IntakeUnit;
use crate::stats;
use crate::store::{Store, StoreError};

/// The ledger engine. Owns the injected store and clock; every mutating
/// call persists the whole document before returning, so reads always
/// see the latest write.
pub struct App {
    store: Store,
    clock: Box<dyn Clock>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub kind_id: String,
    pub label: String,
    pub amount: f64,
    pub unit: IntakeUnit,
    pub hydration_contribution: i64,
    pub created_at: String,
    pub day_key: String,
}

impl From<Event> for EventView {
    fn from(value: Event) -> Self {
        Self {
            id: value.id,
            kind_id: value.kind_id,
            label: value.label,
            amount: value.amount,
            unit: value.unit,
            hydration_contribution: value.hydration_contribution,
            created_at: value.created_at,
            day_key: value.day_key,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub day: String,
    pub total_hydration: i64,
    pub goal: i64,
    /// Unclamped: exceeding the goal reads as more than 100.
    pub percentage: f64,
    pub goal_reached: bool,
    pub events: Vec<EventView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDay {
    pub day: String,
    pub label: String,
    pub total: i64,
    pub is_today: bool,
}

impl App {
    pub fn open(db_path: &str) -> Result<Self, AppError> {
        ensure_parent_dir(db_path)?;
        let store = Store::open(db_path)?;
        Self::with_clock(store, Box::new(SystemClock))
    }

    /// Engine over an explicit store and clock. Runs the one-time
    /// document migration before anything else touches the store.
    pub fn with_clock(store: Store, clock: Box<dyn Clock>) -> Result<Self, AppError> {
        let app = Self { store, clock };
        app.store.migrate(app.clock.as_ref())?;
        Ok(app)
    }

    /// Validate and record one intake event. `None` amount uses the
    /// kind's default quick-entry amount.
    pub fn add_event(
        &self,
        kind_id: &str,
        amount: Option<f64>,
        custom_label: Option<&str>,
    ) -> Result<EventView, AppError> {
        let kind = kind::lookup(kind_id)
            .ok_or_else(|| AppError::UnknownKind(kind_id.trim().to_string()))?;

        let amount = amount.unwrap_or(kind.default_amount);
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::InvalidAmount(amount));
        }

        let label = resolve_label(kind, custom_label)?;
        let now = self.clock.now();
        let event = Event {
            id: new_event_id(),
            kind_id: kind.id.to_string(),
            label,
            amount,
            unit: kind.unit,
            hydration_contribution: hydration_contribution(amount, kind.factor),
            created_at: day::rfc3339(now),
            day_key: day::day_key_for(now),
        };

        let mut ledger = self.load_ledger()?;
        ledger.entries.push(event.clone());
        self.store.save_ledger(&ledger)?;
        Ok(EventView::from(event))
    }

    /// Remove by exact id. A stale or never-issued id is `NotFound` so
    /// callers can tell a double delete from a successful one.
    pub fn remove_event(&self, id: &str) -> Result<EventView, AppError> {
        let mut ledger = self.load_ledger()?;
        let removed = ledger
            .remove(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        self.store.save_ledger(&ledger)?;
        Ok(EventView::from(removed))
    }

    /// Resolve a full id or a unique id prefix to the full event id.
    pub fn resolve_event_id(&self, reference: &str) -> Result<String, AppError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(AppError::InvalidArgument(
                "an event id is required".to_string(),
            ));
        }

        let ledger = self.load_ledger()?;
        if ledger.find(reference).is_some() {
            return Ok(reference.to_string());
        }

        let matches: Vec<&Event> = ledger
            .entries
            .iter()
            .filter(|event| event.id.starts_with(reference))
            .collect();
        match matches.as_slice() {
            [] => Err(AppError::NotFound(reference.to_string())),
            [single] => Ok(single.id.clone()),
            _ => Err(AppError::InvalidArgument(format!(
                "event id '{}' is ambiguous ({} matches)",
                reference,
                matches.len()
            ))),
        }
    }

    pub fn daily_stats(&self, day: Option<&str>) -> Result<DailyStats, AppError> {
        let day_key = match day {
            None => day::today(self.clock.as_ref()),
            Some(raw) => day::format_day_key(day::parse_day_key(raw)?),
        };

        let ledger = self.load_ledger()?;
        let settings = self.load_settings()?;
        let total = stats::daily_total(&ledger.entries, &day_key);
        let events = stats::entries_for_day(&ledger.entries, &day_key)
            .into_iter()
            .cloned()
            .map(EventView::from)
            .collect();

        Ok(DailyStats {
            day: day_key,
            total_hydration: total,
            goal: settings.goal,
            percentage: total as f64 / settings.goal as f64 * 100.0,
            goal_reached: total >= settings.goal,
            events,
        })
    }

    /// The 7 calendar days ending at `ending` (default today), oldest
    /// first, zero-filled for days without events.
    pub fn weekly_stats(&self, ending: Option<&str>) -> Result<Vec<WeeklyDay>, AppError> {
        let ending_date = match ending {
            None => self.clock.now().date(),
            Some(raw) => day::parse_day_key(raw)?,
        };
        let today_key = day::today(self.clock.as_ref());

        let ledger = self.load_ledger()?;
        let window = stats::weekly_window(ending_date);
        let totals = stats::weekly_totals(&ledger.entries, &window);

        Ok(window
            .iter()
            .zip(totals)
            .map(|(date, total)| {
                let day_key = day::format_day_key(*date);
                WeeklyDay {
                    label: day::weekday_label(*date).to_string(),
                    is_today: day_key == today_key,
                    day: day_key,
                    total,
                }
            })
            .collect())
    }

    /// Catalog enumeration for pick-lists.
    pub fn kinds(&self) -> &'static [IntakeKind] {
        &CATALOG
    }

    /// Read-only settings view (also what the reminder scheduler gets).
    pub fn settings(&self) -> Result<Settings, AppError> {
        self.load_settings()
    }

    pub fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, AppError> {
        if !patch.has_changes() {
            return Err(AppError::InvalidArgument(
                "settings update requires at least one field change".to_string(),
            ));
        }

        let mut settings = self.load_settings()?;

        if let Some(goal) = patch.goal {
            if goal <= 0 {
                return Err(AppError::InvalidArgument(
                    "goal must be a positive number of milliliters".to_string(),
                ));
            }
            settings.goal = goal;
        }
        if let Some(theme) = patch.theme {
            settings.theme = theme;
        }
        if let Some(enabled) = patch.notifications_enabled {
            settings.notifications_enabled = enabled;
        }
        if let Some(wake) = patch.wake_time.as_deref() {
            parse_reminder_time(wake)?;
            settings.wake_time = wake.trim().to_string();
        }
        if let Some(sleep) = patch.sleep_time.as_deref() {
            parse_reminder_time(sleep)?;
            settings.sleep_time = sleep.trim().to_string();
        }

        self.store.save_settings(&settings)?;
        Ok(settings)
    }

    /// Corrupt documents are recovered to defaults rather than taking
    /// the whole app down; the warning goes to stderr so the recovery
    /// is never silent. The next save overwrites the bad body.
    fn load_ledger(&self) -> Result<Ledger, AppError> {
        match self.store.load_ledger() {
            Ok(ledger) => Ok(ledger),
            Err(err @ StoreError::Corrupt { .. }) => {
                eprintln!("warning: {err}; continuing with an empty ledger");
                Ok(Ledger::default())
            }
            Err(err) => Err(AppError::Store(err)),
        }
    }

    fn load_settings(&self) -> Result<Settings, AppError> {
        match self.store.load_settings() {
            Ok(mut settings) => {
                // A tampered document must not break the goal>0 invariant.
                if settings.goal <= 0 {
                    settings.goal = DEFAULT_GOAL;
                }
                Ok(settings)
            }
            Err(err @ StoreError::Corrupt { .. }) => {
                eprintln!("warning: {err}; continuing with default settings");
                Ok(Settings::default())
            }
            Err(err) => Err(AppError::Store(err)),
        }
    }
}

/// `floor(amount × factor)`, the stored per-event contribution.
pub fn hydration_contribution(amount: f64, factor: f64) -> i64 {
    (amount * factor).floor() as i64
}

fn new_event_id() -> String {
    Uuid::now_v7().to_string()
}

fn resolve_label(kind: &IntakeKind, custom_label: Option<&str>) -> Result<String, AppError> {
    let trimmed = custom_label.map(str::trim).filter(|label| !label.is_empty());
    if kind.requires_custom_label && trimmed.is_none() {
        return Err(AppError::MissingLabel(kind.id.to_string()));
    }
    Ok(trimmed
        .map(str::to_string)
        .unwrap_or_else(|| kind.label.to_string()))
}

fn ensure_parent_dir(path: &str) -> Result<(), AppError> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Store(StoreError),
    UnknownKind(String),
    InvalidAmount(f64),
    MissingLabel(String),
    NotFound(String),
    InvalidArgument(String),
    ParseDay(ParseDayKeyError),
    ParseTheme(ParseThemeError),
    ParseReminderTime(ParseReminderTimeError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::UnknownKind(kind_id) => write!(
                f,
                "unknown intake kind '{}': expected one of {}",
                kind_id,
                CATALOG
                    .iter()
                    .map(|kind| kind.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            AppError::InvalidAmount(amount) => {
                write!(f, "amount must be a positive number, got {}", amount)
            }
            AppError::MissingLabel(kind_id) => {
                write!(
                    f,
                    "intake kind '{}' requires a label (use --label)",
                    kind_id
                )
            }
            AppError::NotFound(id) => write!(f, "no event with id '{}'", id),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::ParseDay(err) => write!(f, "{}", err),
            AppError::ParseTheme(err) => write!(f, "{}", err),
            AppError::ParseReminderTime(err) => write!(f, "{}", err),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::ParseDay(err) => Some(err),
            AppError::ParseTheme(err) => Some(err),
            AppError::ParseReminderTime(err) => Some(err),
            AppError::UnknownKind(_)
            | AppError::InvalidAmount(_)
            | AppError::MissingLabel(_)
            | AppError::NotFound(_)
            | AppError::InvalidArgument(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<ParseDayKeyError> for AppError {
    fn from(value: ParseDayKeyError) -> Self {
        AppError::ParseDay(value)
    }
}

impl From<ParseThemeError> for AppError {
    fn from(value: ParseThemeError) -> Self {
        AppError::ParseTheme(value)
    }
}

impl From<ParseReminderTimeError> for AppError {
    fn from(value: ParseReminderTimeError) -> Self {
        AppError::ParseReminderTime(value)
    }
}
