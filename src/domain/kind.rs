use serde::Serialize;

use crate::domain::unit::IntakeUnit;

/// One entry type from the static catalog. The hydration factor is the
/// fraction of the raw amount that counts toward the daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntakeKind {
    pub id: &'static str,
    pub label: &'static str,
    pub factor: f64,
    pub unit: IntakeUnit,
    pub default_amount: f64,
    pub requires_custom_label: bool,
}

/// Safety rails for volume entry in the presentation layer. The engine
/// itself accepts any positive amount.
pub const MIN_VOLUME_INPUT: f64 = 50.0;
pub const MAX_VOLUME_INPUT: f64 = 2000.0;

pub const CATALOG: [IntakeKind; 6] = [
    IntakeKind {
        id: "water",
        label: "Water",
        factor: 1.0,
        unit: IntakeUnit::Volume,
        default_amount: 200.0,
        requires_custom_label: false,
    },
    IntakeKind {
        id: "coffee",
        label: "Coffee",
        // mild diuretic
        factor: 0.85,
        unit: IntakeUnit::Volume,
        default_amount: 100.0,
        requires_custom_label: false,
    },
    IntakeKind {
        id: "tea",
        label: "Tea",
        factor: 0.95,
        unit: IntakeUnit::Volume,
        default_amount: 150.0,
        requires_custom_label: false,
    },
    IntakeKind {
        id: "soda",
        label: "Soda",
        // sugar/sodium reduce effective hydration
        factor: 0.85,
        unit: IntakeUnit::Volume,
        default_amount: 350.0,
        requires_custom_label: false,
    },
    IntakeKind {
        id: "juice",
        label: "Juice",
        factor: 0.90,
        unit: IntakeUnit::Volume,
        default_amount: 250.0,
        requires_custom_label: false,
    },
    IntakeKind {
        id: "medicine",
        label: "Medicine",
        // does not count toward the goal; the caller must name it
        factor: 0.0,
        unit: IntakeUnit::Count,
        default_amount: 1.0,
        requires_custom_label: true,
    },
];

/// Resolve a kind id to its catalog entry. Unknown ids are a caller
/// error; the engine never substitutes a default.
pub fn lookup(kind_id: &str) -> Option<&'static IntakeKind> {
    let normalized = kind_id.trim().to_ascii_lowercase();
    CATALOG.iter().find(|kind| kind.id == normalized)
}
