use serde::{Deserialize, Serialize};

use crate::domain::unit::IntakeUnit;

/// One intake record. Events are append/remove only; every derived field
/// (`hydration_contribution`, `day_key`, `unit`) is computed once at
/// creation and persisted so later reads never depend on the catalog or
/// the current time zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub kind_id: String,
    pub label: String,
    pub amount: f64,
    pub unit: IntakeUnit,
    pub hydration_contribution: i64,
    /// RFC3339 creation instant.
    pub created_at: String,
    /// Local calendar day (`YYYY-MM-DD`) the event is attributed to.
    pub day_key: String,
}

/// The durable event log. Entries keep insertion order; display ordering
/// is a presentation concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub entries: Vec<Event>,
}

impl Ledger {
    pub fn find(&self, id: &str) -> Option<&Event> {
        self.entries.iter().find(|event| event.id == id)
    }

    /// Remove the event with the exact id, returning it. `None` means the
    /// id is stale or was never issued.
    pub fn remove(&mut self, id: &str) -> Option<Event> {
        let position = self.entries.iter().position(|event| event.id == id)?;
        Some(self.entries.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, Ledger};
    use crate::domain::unit::IntakeUnit;

    fn sample_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            kind_id: "water".to_string(),
            label: "Water".to_string(),
            amount: 200.0,
            unit: IntakeUnit::Volume,
            hydration_contribution: 200,
            created_at: "2024-06-01T08:30:00Z".to_string(),
            day_key: "2024-06-01".to_string(),
        }
    }

    #[test]
    fn remove_returns_the_event_and_drops_it() {
        let mut ledger = Ledger {
            entries: vec![sample_event("a"), sample_event("b")],
        };

        let removed = ledger.remove("a").expect("event should be removable");
        assert_eq!(removed.id, "a");
        assert_eq!(ledger.entries.len(), 1);
        assert!(ledger.find("a").is_none());
        assert!(ledger.find("b").is_some());
    }

    #[test]
    fn remove_of_stale_id_is_none() {
        let mut ledger = Ledger {
            entries: vec![sample_event("a")],
        };
        assert!(ledger.remove("missing").is_none());
        assert_eq!(ledger.entries.len(), 1);
    }

    #[test]
    fn events_persist_with_camel_case_wire_names() {
        let json = serde_json::to_value(sample_event("a")).expect("serialize should succeed");
        assert!(json.get("kindId").is_some());
        assert!(json.get("hydrationContribution").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("dayKey").is_some());
        assert_eq!(json["unit"], "ml");
    }

    #[test]
    fn empty_ledger_deserializes_from_bare_document() {
        let ledger: Ledger =
            serde_json::from_str(r#"{"entries":[]}"#).expect("empty document should parse");
        assert!(ledger.entries.is_empty());
    }
}
