use std::error::Error;
use std::fmt;
use std::time::Duration;

use rusqlite::{params, Connection, DatabaseName, OptionalExtension};
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::day;
use crate::day::Clock;
use crate::domain::event::Ledger;
use crate::domain::kind;
use crate::domain::settings::Settings;

pub const CURRENT_SCHEMA_VERSION: i64 = 1;

pub const LEDGER_DOC: &str = "ledger";
pub const SETTINGS_DOC: &str = "settings";

/// Legacy day field from the oldest document schema, `DD/MM/YYYY`.
const LEGACY_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[day]/[month]/[year]");

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: [Migration; 1] = [Migration {
    version: 1,
    name: "baseline_document_store_v1",
    sql: r#"
CREATE TABLE IF NOT EXISTS document (
    name TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#,
}];

/// Durable store for the two named JSON documents (ledger, settings).
/// Each save fully replaces the document body in one statement, so a
/// document is never persisted half-patched.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let mut conn = Connection::open(path)?;
        configure_for_speed(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn load_ledger(&self) -> Result<Ledger, StoreError> {
        match self.load_document(LEDGER_DOC)? {
            None => Ok(Ledger::default()),
            Some(body) => serde_json::from_str(&body).map_err(|source| StoreError::Corrupt {
                document: LEDGER_DOC,
                source,
            }),
        }
    }

    pub fn save_ledger(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let body = serde_json::to_string(ledger).map_err(StoreError::Encode)?;
        self.save_document(LEDGER_DOC, &body)
    }

    pub fn load_settings(&self) -> Result<Settings, StoreError> {
        match self.load_document(SETTINGS_DOC)? {
            None => Ok(Settings::default()),
            Some(body) => serde_json::from_str(&body).map_err(|source| StoreError::Corrupt {
                document: SETTINGS_DOC,
                source,
            }),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let body = serde_json::to_string(settings).map_err(StoreError::Encode)?;
        self.save_document(SETTINGS_DOC, &body)
    }

    /// One-time upgrade of legacy ledger shapes. Runs at startup before
    /// any read; a second run over already-migrated data is a no-op.
    /// Undecodable bodies are left in place for the corrupt-document
    /// fallback at load time.
    pub fn migrate(&self, clock: &dyn Clock) -> Result<bool, StoreError> {
        let Some(body) = self.load_document(LEDGER_DOC)? else {
            return Ok(false);
        };
        let Ok(document) = serde_json::from_str::<Value>(&body) else {
            return Ok(false);
        };
        let Some(migrated) = migrate_ledger_document(&document, clock) else {
            return Ok(false);
        };
        let body = serde_json::to_string(&migrated).map_err(StoreError::Encode)?;
        self.save_document(LEDGER_DOC, &body)?;
        Ok(true)
    }

    pub fn load_document(&self, name: &str) -> Result<Option<String>, StoreError> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM document WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    pub fn save_document(&self, name: &str, body: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
INSERT INTO document (name, body, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(name) DO UPDATE SET
    body = excluded.body,
    updated_at = excluded.updated_at
"#,
            params![name, body, now_utc_rfc3339()],
        )?;
        Ok(())
    }
}

fn configure_for_speed(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None::<DatabaseName>, "journal_mode", "WAL")?;
    conn.pragma_update(None::<DatabaseName>, "synchronous", "NORMAL")?;
    conn.pragma_update(None::<DatabaseName>, "temp_store", "MEMORY")?;
    conn.pragma_update(None::<DatabaseName>, "busy_timeout", 5000i64)?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
);
"#,
    )?;

    for migration in MIGRATIONS {
        let already_applied: Option<i64> = tx
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                params![migration.version],
                |row| row.get(0),
            )
            .optional()?;

        if already_applied.is_some() {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, now_utc_rfc3339()],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn now_utc_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("RFC3339 formatting for UTC timestamp should never fail")
}

/// Shape-detect and upgrade a raw ledger document. Returns `None` when
/// the document is already in the current shape.
fn migrate_ledger_document(document: &Value, clock: &dyn Clock) -> Option<Value> {
    let object = document.as_object()?;
    let now = clock.now();

    let migrated = if object.get("consumed").is_some_and(Value::is_number)
        && !object.contains_key("entries")
    {
        migrate_consumed_document(object, now)
    } else {
        let entries = object.get("entries")?.as_array()?;
        let normalized: Vec<Value> = entries
            .iter()
            .map(|entry| normalize_entry(entry, now))
            .collect();
        json!({ "entries": normalized })
    };

    if migrated == *document {
        None
    } else {
        Some(migrated)
    }
}

/// Oldest schema: a single running `consumed` counter. The whole value
/// becomes one imported water entry attributed to the document's
/// `currentDate` when that parses.
fn migrate_consumed_document(
    object: &serde_json::Map<String, Value>,
    now: OffsetDateTime,
) -> Value {
    let consumed = object.get("consumed").and_then(Value::as_f64).unwrap_or(0.0);
    let mut entries = Vec::new();

    if consumed > 0.0 {
        let day_key = object
            .get("currentDate")
            .and_then(Value::as_str)
            .and_then(parse_legacy_date)
            .map(day::format_day_key)
            .unwrap_or_else(|| day::day_key_for(now));

        entries.push(json!({
            "id": Uuid::now_v7().to_string(),
            "kindId": "water",
            "label": "Water (imported)",
            "amount": consumed,
            "unit": "ml",
            "hydrationContribution": consumed.floor() as i64,
            "createdAt": day::rfc3339(now),
            "dayKey": day_key,
        }));
    }

    json!({ "entries": entries })
}

/// Rewrite one entry into the current shape: legacy field names are
/// renamed, missing `dayKey`/`unit` are derived, numeric timestamps
/// become RFC3339. Entries already in the current shape come back
/// value-identical.
fn normalize_entry(entry: &Value, now: OffsetDateTime) -> Value {
    let Some(object) = entry.as_object() else {
        return entry.clone();
    };
    let offset = now.offset();

    let kind_id = object
        .get("kindId")
        .or_else(|| object.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("water")
        .to_string();
    let kind = kind::lookup(&kind_id);

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let label = object
        .get("label")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| kind.map_or_else(|| kind_id.clone(), |kind| kind.label.to_string()));

    let amount = object
        .get("amount")
        .filter(|value| value.is_number())
        .cloned()
        .unwrap_or_else(|| json!(0.0));

    let unit = object
        .get("unit")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| kind.map_or("ml", |kind| kind.unit.as_str()).to_string());

    let contribution = object
        .get("hydrationContribution")
        .or_else(|| object.get("hydrationML"))
        .and_then(Value::as_f64)
        .unwrap_or_else(|| {
            amount.as_f64().unwrap_or(0.0) * kind.map_or(0.0, |kind| kind.factor)
        })
        .floor() as i64;

    let created_at = object
        .get("createdAt")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            object
                .get("timestamp")
                .and_then(Value::as_i64)
                .and_then(instant_from_unix_millis)
                .map(|instant| day::rfc3339(instant.to_offset(offset)))
        })
        .unwrap_or_else(|| day::rfc3339(now));

    let day_key = object
        .get("dayKey")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            day::parse_rfc3339(&created_at)
                .map(|instant| day::local_day_key(instant, offset))
                .unwrap_or_else(|| day::day_key_for(now))
        });

    json!({
        "id": id,
        "kindId": kind_id,
        "label": label,
        "amount": amount,
        "unit": unit,
        "hydrationContribution": contribution,
        "createdAt": created_at,
        "dayKey": day_key,
    })
}

fn instant_from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

fn parse_legacy_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), LEGACY_DATE_FORMAT).ok()
}

#[derive(Debug)]
pub enum StoreError {
    Db(rusqlite::Error),
    Corrupt {
        document: &'static str,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(err) => write!(f, "database error: {}", err),
            StoreError::Corrupt { document, source } => {
                write!(f, "stored {} document is corrupt: {}", document, source)
            }
            StoreError::Encode(err) => write!(f, "document encoding error: {}", err),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Db(err) => Some(err),
            StoreError::Corrupt { source, .. } => Some(source),
            StoreError::Encode(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        StoreError::Db(value)
    }
}
